//! Port interfaces for the hosted document store and authentication service
//!
//! Screens and the session bootstrap only talk to these traits. The Firebase
//! adapters implement them against the REST endpoints; the in-memory adapters
//! back tests and offline runs.

use async_trait::async_trait;
use tokio::sync::watch;

mod error;
pub mod firebase_auth;
pub mod firestore;
pub mod memory;
mod path;
pub mod value;

pub use error::{AuthError, BackendError};
pub use firebase_auth::FirebaseAuth;
pub use firestore::FirestoreClient;
pub use path::{CollectionPath, DocumentPath};
pub use value::{FieldValue, Fields, FieldsExt};

/// A document read from the store
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Comparison operator of a single-field filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equal,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl FilterOp {
    /// Operator name in structured queries
    pub fn as_wire(&self) -> &'static str {
        match self {
            FilterOp::Equal => "EQUAL",
            FilterOp::LessThan => "LESS_THAN",
            FilterOp::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            FilterOp::GreaterThan => "GREATER_THAN",
            FilterOp::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
        }
    }
}

/// `field <op> value` filter for collection reads
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: FieldValue,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluate the filter locally. Missing fields and values of another kind never match.
    pub fn matches(&self, fields: &Fields) -> bool {
        use std::cmp::Ordering::*;

        let Some(ordering) = fields
            .get(&self.field)
            .and_then(|value| value.compare(&self.value))
        else {
            return false;
        };

        match self.op {
            FilterOp::Equal => ordering == Equal,
            FilterOp::LessThan => ordering == Less,
            FilterOp::LessThanOrEqual => ordering != Greater,
            FilterOp::GreaterThan => ordering == Greater,
            FilterOp::GreaterThanOrEqual => ordering != Less,
        }
    }
}

/// Trait for document reads and writes
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document; `Ok(None)` when it does not exist
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>, BackendError>;

    /// Fetch every document of a collection
    async fn list_documents(&self, collection: &CollectionPath)
        -> Result<Vec<Document>, BackendError>;

    /// Fetch the documents of a collection matching a filter
    async fn query_documents(
        &self,
        collection: &CollectionPath,
        filter: &FieldFilter,
    ) -> Result<Vec<Document>, BackendError>;

    /// Create a document with a generated id and return that id
    async fn create_document(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<String, BackendError>;

    /// Create or fully replace the document at `path`
    async fn set_document(&self, path: &DocumentPath, fields: Fields) -> Result<(), BackendError>;

    /// Overwrite only the given fields of an existing document
    async fn update_fields(&self, path: &DocumentPath, fields: Fields)
        -> Result<(), BackendError>;
}

/// Signed-in identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
}

/// Trait for the authentication service
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in and make the identity current
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Create an account without touching the current session
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    fn current_user(&self) -> Option<AuthUser>;

    /// Subscribe to identity changes; the current identity is delivered first
    fn subscribe(&self) -> AuthSubscription;
}

/// Publisher side of the identity-change stream, shared by the auth adapters
#[derive(Debug)]
pub struct AuthStateChannel {
    sender: watch::Sender<Option<AuthUser>>,
}

impl AuthStateChannel {
    pub fn new(initial: Option<AuthUser>) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        Self { sender }
    }

    pub fn publish(&self, user: Option<AuthUser>) {
        self.sender.send_replace(user);
    }

    pub fn current(&self) -> Option<AuthUser> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            receiver: Some(self.sender.subscribe()),
            primed: false,
        }
    }
}

/// Cancellable identity-change subscription. Dropping it releases the listener.
#[derive(Debug)]
pub struct AuthSubscription {
    receiver: Option<watch::Receiver<Option<AuthUser>>>,
    primed: bool,
}

impl AuthSubscription {
    /// Wait for the next identity. Returns `None` once cancelled or when the
    /// authentication service is gone.
    pub async fn next(&mut self) -> Option<Option<AuthUser>> {
        let receiver = self.receiver.as_mut()?;

        if !self.primed {
            self.primed = true;
            return Some(receiver.borrow_and_update().clone());
        }

        receiver.changed().await.ok()?;
        Some(receiver.borrow_and_update().clone())
    }

    pub fn unsubscribe(&mut self) {
        if self.receiver.take().is_some() {
            tracing::debug!("Auth state subscription released");
        }
    }

    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(uid: &str) -> AuthUser {
        AuthUser {
            uid: uid.to_string(),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_subscription_delivers_current_identity_first() {
        let channel = AuthStateChannel::new(Some(user("u1")));
        let mut subscription = channel.subscribe();

        assert_eq!(subscription.next().await, Some(Some(user("u1"))));

        channel.publish(None);
        assert_eq!(subscription.next().await, Some(None));
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let channel = AuthStateChannel::new(None);
        let mut subscription = channel.subscribe();
        subscription.unsubscribe();

        channel.publish(Some(user("u2")));
        assert!(!subscription.is_active());
        assert_eq!(subscription.next().await, None);
    }

    #[test]
    fn test_filter_matches() {
        let mut fields = Fields::new();
        fields.insert("volume".to_string(), FieldValue::IntegerValue(10));

        assert!(FieldFilter::new("volume", FilterOp::GreaterThanOrEqual, 10_i64).matches(&fields));
        assert!(FieldFilter::new("volume", FilterOp::LessThan, 10.5).matches(&fields));
        assert!(!FieldFilter::new("volume", FilterOp::Equal, "10").matches(&fields));
        assert!(!FieldFilter::new("missing", FilterOp::Equal, 1_i64).matches(&fields));
    }
}
