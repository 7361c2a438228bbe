//! Session bootstrap: listens for identity changes and resolves the role of
//! the signed-in user from their profile document.
//!
//! [`SessionContext`] is the only owner of session state. It is created at
//! startup, holds the only identity-change subscription, and releases it on
//! [`SessionContext::shutdown`] or drop.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::backend::{AuthProvider, AuthUser, DocumentStore};
use crate::config::CollectionsConfig;
use crate::models::{FromDocument, Role, UserProfile};

/// Process-wide session state
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Waiting for the first identity event or a profile fetch
    Initializing,
    SignedOut,
    SignedIn {
        user: AuthUser,
        profile: UserProfile,
        role: Role,
    },
    /// Signed in, but no profile document exists for the identity
    ProfileMissing { user: AuthUser },
    /// Signed in, but the profile could not be read
    ProfileUnavailable { user: AuthUser, reason: String },
}

impl SessionState {
    pub fn is_initializing(&self) -> bool {
        matches!(self, SessionState::Initializing)
    }

    /// Identity of the session, if any
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            SessionState::SignedIn { user, .. }
            | SessionState::ProfileMissing { user }
            | SessionState::ProfileUnavailable { user, .. } => Some(user),
            SessionState::Initializing | SessionState::SignedOut => None,
        }
    }

    /// Identifier of the signed-in user, used to scope owner reads
    pub fn uid(&self) -> Option<&str> {
        self.user().map(|user| user.uid.as_str())
    }

    pub fn role(&self) -> Option<&Role> {
        match self {
            SessionState::SignedIn { role, .. } => Some(role),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            SessionState::SignedIn { profile, .. } => Some(profile),
            _ => None,
        }
    }
}

/// Resolve the session for one identity event
pub async fn resolve(
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    user: Option<AuthUser>,
) -> SessionState {
    let Some(user) = user else {
        tracing::info!("No signed-in identity, clearing session");
        return SessionState::SignedOut;
    };

    let path = collections.profile(&user.uid);
    match store.get_document(&path).await {
        Ok(Some(doc)) => match UserProfile::from_document(&doc) {
            Ok(profile) => {
                let role = profile.resolved_role();
                tracing::info!("Session resolved for {} with role {}", user.uid, role);
                SessionState::SignedIn {
                    user,
                    profile,
                    role,
                }
            }
            Err(e) => {
                tracing::error!("Unreadable profile for {}: {}", user.uid, e);
                SessionState::ProfileUnavailable {
                    user,
                    reason: e.to_string(),
                }
            }
        },
        Ok(None) => {
            tracing::warn!("No profile document found for {}", user.uid);
            SessionState::ProfileMissing { user }
        }
        Err(e) => {
            tracing::error!("Error fetching the role of {}: {}", user.uid, e);
            SessionState::ProfileUnavailable {
                user,
                reason: e.to_string(),
            }
        }
    }
}

/// Owned session: identity subscription, resolved state, and the backends
pub struct SessionContext {
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn DocumentStore>,
    collections: CollectionsConfig,
    state: watch::Receiver<SessionState>,
    listener: Option<JoinHandle<()>>,
}

impl SessionContext {
    /// Subscribe to identity changes and start resolving sessions
    pub fn start(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn DocumentStore>,
        collections: CollectionsConfig,
    ) -> Self {
        let (sender, state) = watch::channel(SessionState::Initializing);
        let mut subscription = auth.subscribe();

        let listener = {
            let store = Arc::clone(&store);
            let collections = collections.clone();
            tokio::spawn(async move {
                while let Some(user) = subscription.next().await {
                    if user.is_some() {
                        sender.send_replace(SessionState::Initializing);
                    }
                    let resolved = resolve(store.as_ref(), &collections, user).await;
                    sender.send_replace(resolved);
                }
                subscription.unsubscribe();
                tracing::debug!("Session listener stopped");
            })
        };

        Self {
            auth,
            store,
            collections,
            state,
            listener: Some(listener),
        }
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver for observing session changes
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Wait until the session leaves `Initializing`, up to `timeout`.
    /// Returns `None` on timeout.
    pub async fn settled(&self, timeout: Duration) -> Option<SessionState> {
        let mut state = self.state.clone();
        let wait = state.wait_for(|s| !s.is_initializing());

        let outcome = match tokio::time::timeout(timeout, wait).await {
            Ok(Ok(settled)) => Some(settled.clone()),
            Ok(Err(_)) => {
                let current = self.state();
                (!current.is_initializing()).then_some(current)
            }
            Err(_) => {
                tracing::warn!("Session still initializing after {:?}", timeout);
                None
            }
        };
        outcome
    }

    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.auth
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn collections(&self) -> &CollectionsConfig {
        &self.collections
    }

    pub fn is_listening(&self) -> bool {
        self.listener
            .as_ref()
            .is_some_and(|listener| !listener.is_finished())
    }

    /// Release the identity subscription
    pub fn shutdown(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            tracing::debug!("Session context shut down");
        }
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}
