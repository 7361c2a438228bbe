// In-memory adapters for tests and offline runs

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use super::{
    AuthError, AuthProvider, AuthStateChannel, AuthSubscription, AuthUser, BackendError,
    CollectionPath, Document, DocumentPath, DocumentStore, FieldFilter, Fields,
};

/// Document store kept in a map keyed by document path
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<String, Fields>>,
    failing: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self) -> MutexGuard<'_, BTreeMap<String, Fields>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a document without counting it as a write
    pub fn insert(&self, path: &DocumentPath, fields: Fields) {
        self.documents().insert(path.as_str().to_string(), fields);
    }

    /// Make every following call fail with a server error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of read calls issued so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of write calls issued so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fields(&self, path: &DocumentPath) -> Option<Fields> {
        self.documents().get(path.as_str()).cloned()
    }

    fn check(&self, counter: &AtomicUsize) -> Result<(), BackendError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::ServerError("store unavailable".to_string()));
        }
        Ok(())
    }

    fn children(&self, collection: &CollectionPath) -> Vec<Document> {
        let prefix = format!("{}/", collection.as_str());
        self.documents()
            .iter()
            .filter_map(|(path, fields)| {
                let id = path.strip_prefix(&prefix)?;
                (!id.contains('/')).then(|| Document {
                    id: id.to_string(),
                    fields: fields.clone(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>, BackendError> {
        self.check(&self.reads)?;
        Ok(self.fields(path).map(|fields| Document {
            id: path.id().to_string(),
            fields,
        }))
    }

    async fn list_documents(
        &self,
        collection: &CollectionPath,
    ) -> Result<Vec<Document>, BackendError> {
        self.check(&self.reads)?;
        Ok(self.children(collection))
    }

    async fn query_documents(
        &self,
        collection: &CollectionPath,
        filter: &FieldFilter,
    ) -> Result<Vec<Document>, BackendError> {
        self.check(&self.reads)?;
        Ok(self
            .children(collection)
            .into_iter()
            .filter(|doc| filter.matches(&doc.fields))
            .collect())
    }

    async fn create_document(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<String, BackendError> {
        self.check(&self.writes)?;
        let id = Uuid::new_v4().simple().to_string();
        self.insert(&collection.doc(&id), fields);
        Ok(id)
    }

    async fn set_document(&self, path: &DocumentPath, fields: Fields) -> Result<(), BackendError> {
        self.check(&self.writes)?;
        self.insert(path, fields);
        Ok(())
    }

    async fn update_fields(&self, path: &DocumentPath, fields: Fields) -> Result<(), BackendError> {
        self.check(&self.writes)?;
        let mut documents = self.documents();
        let existing = documents
            .get_mut(path.as_str())
            .ok_or_else(|| BackendError::NotFound(path.to_string()))?;
        existing.extend(fields);
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    password: String,
}

/// Authentication service with accounts held in memory
#[derive(Debug)]
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, Account>>,
    state: AuthStateChannel,
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            state: AuthStateChannel::new(None),
        }
    }
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an account with a fixed uid
    pub fn add_account(&self, uid: &str, email: &str, password: &str) {
        self.accounts().insert(
            email.to_lowercase(),
            Account {
                uid: uid.to_string(),
                password: password.to_string(),
            },
        );
    }

    /// Publish an identity directly, as if the service restored a session
    pub fn set_current(&self, user: Option<AuthUser>) {
        self.state.publish(user);
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let account = self
            .accounts()
            .get(&email.to_lowercase())
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        if account.password != password {
            return Err(AuthError::InvalidCredentials);
        }

        let user = AuthUser {
            uid: account.uid,
            email: Some(email.to_string()),
        };
        self.state.publish(Some(user.clone()));
        Ok(user)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let key = email.to_lowercase();
        let mut accounts = self.accounts();
        if accounts.contains_key(&key) {
            return Err(AuthError::EmailAlreadyExists);
        }

        let uid = Uuid::new_v4().simple().to_string();
        accounts.insert(
            key,
            Account {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );

        Ok(AuthUser {
            uid,
            email: Some(email.to_string()),
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.state.publish(None);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.state.current()
    }

    fn subscribe(&self) -> AuthSubscription {
        self.state.subscribe()
    }
}
