use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::firestore::TokenSource;
use super::{AuthError, AuthProvider, AuthStateChannel, AuthSubscription, AuthUser, BackendError};
use crate::config::Config;

/// Email/password request for `accounts:signInWithPassword` and `accounts:signUp`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    id_token: String,
    refresh_token: String,
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Secure-token exchange response (snake_case on the wire)
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Authentication backed by the Firebase Auth REST API.
///
/// The session (uid, email, tokens) is persisted to the config file, so a
/// restart resumes the previous sign-in.
pub struct FirebaseAuth {
    client: Client,
    api_key: String,
    auth_url: String,
    token_url: String,
    config: Arc<Mutex<Config>>,
    state: AuthStateChannel,
}

impl FirebaseAuth {
    pub fn new(config: Config) -> Result<Self, BackendError> {
        let timeout = Duration::from_secs(config.firebase.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                BackendError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        let restored = config.is_authenticated().then(|| AuthUser {
            uid: config.auth.uid.clone(),
            email: Some(config.auth.email.clone()).filter(|email| !email.is_empty()),
        });

        if let Some(user) = &restored {
            tracing::info!("Restored session for {}", user.uid);
        }

        Ok(Self {
            client,
            api_key: config.firebase.api_key.clone(),
            auth_url: config.firebase.auth_url.trim_end_matches('/').to_string(),
            token_url: config.firebase.token_url.trim_end_matches('/').to_string(),
            config: Arc::new(Mutex::new(config)),
            state: AuthStateChannel::new(restored),
        })
    }

    fn config(&self) -> MutexGuard<'_, Config> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the config, including the persisted session
    pub fn config_snapshot(&self) -> Config {
        self.config().clone()
    }

    async fn password_call(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<PasswordResponse, AuthError> {
        let url = format!("{}/accounts:{}", self.auth_url, endpoint);
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(BackendError::from)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(response.json().await.map_err(BackendError::from)?)
    }

    async fn error_from(response: Response) -> AuthError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => AuthError::from_code(status, &envelope.error.message),
            Err(_) => AuthError::Backend(BackendError::from_status(status, text)),
        }
    }

    fn persist(&self, update: impl FnOnce(&mut Config)) -> Result<(), AuthError> {
        let mut config = self.config();
        update(&mut config);
        config
            .save()
            .map_err(|e| AuthError::Backend(BackendError::Unknown(format!("{:#}", e))))
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        tracing::debug!("Signing in as {}", email);

        let response = self.password_call("signInWithPassword", email, password).await?;
        let user = AuthUser {
            uid: response.local_id.clone(),
            email: response.email.clone().or_else(|| Some(email.to_string())),
        };

        self.persist(|config| {
            config.set_session(
                response.local_id,
                user.email.clone().unwrap_or_default(),
                response.id_token,
                response.refresh_token,
            )
        })?;

        tracing::info!("Successfully signed in as {}", email);
        self.state.publish(Some(user.clone()));
        Ok(user)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        tracing::debug!("Creating account for {}", email);

        let response = self.password_call("signUp", email, password).await?;

        tracing::info!("Created account {} for {}", response.local_id, email);
        Ok(AuthUser {
            uid: response.local_id,
            email: response.email.or_else(|| Some(email.to_string())),
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.persist(Config::clear_session)?;
        self.state.publish(None);
        tracing::info!("Signed out");
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.state.current()
    }

    fn subscribe(&self) -> AuthSubscription {
        self.state.subscribe()
    }
}

#[async_trait]
impl TokenSource for FirebaseAuth {
    fn id_token(&self) -> Option<String> {
        let config = self.config();
        Some(config.auth.id_token.clone()).filter(|token| !token.is_empty())
    }

    async fn refresh_id_token(&self) -> Result<String, AuthError> {
        let refresh_token = {
            let config = self.config();
            if config.auth.refresh_token.is_empty() {
                return Err(AuthError::NotSignedIn);
            }
            config.auth.refresh_token.clone()
        };

        tracing::debug!("Refreshing ID token");

        let url = format!("{}/token", self.token_url);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(BackendError::from)?;

        if !response.status().is_success() {
            let error = Self::error_from(response).await;
            if error == AuthError::TokenExpired {
                // Refresh token revoked: the session is over
                self.persist(Config::clear_session)?;
                self.state.publish(None);
            }
            return Err(error);
        }

        let refreshed: RefreshResponse = response.json().await.map_err(BackendError::from)?;
        let id_token = refreshed.id_token.clone();

        self.persist(|config| config.set_tokens(refreshed.id_token, refreshed.refresh_token))?;

        tracing::info!("Successfully refreshed ID token");
        Ok(id_token)
    }
}
