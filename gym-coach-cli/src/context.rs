use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gym_coach::backend::firestore::TokenSource;
use gym_coach::backend::{AuthProvider, DocumentStore, FirebaseAuth, FirestoreClient};
use gym_coach::config::{CollectionsConfig, Config};
use gym_coach::router::{route, Route, Screen};
use gym_coach::session::{SessionContext, SessionState};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(15);

/// Load the config from `--config`, or the default location
pub fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(PathBuf::from(path)),
        None => Config::load(),
    }
}

/// Backends and session of one CLI invocation
pub struct AppContext {
    pub config: Config,
    session: SessionContext,
}

impl AppContext {
    /// Connect to the configured backend and start the session bootstrap
    pub fn connect(config: Config) -> Result<Self> {
        config
            .validate()
            .context("Backend is not configured; run 'gym-coach config init' and edit the file")?;

        let auth = Arc::new(FirebaseAuth::new(config.clone())?);
        let tokens: Arc<dyn TokenSource> = auth.clone();
        let store: Arc<dyn DocumentStore> = Arc::new(FirestoreClient::new(&config, Some(tokens))?);
        let session = SessionContext::start(auth, store, config.collections.clone());

        Ok(Self { config, session })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn auth(&self) -> &dyn AuthProvider {
        self.session.auth().as_ref()
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.session.store().as_ref()
    }

    pub fn collections(&self) -> &CollectionsConfig {
        self.session.collections()
    }

    /// Wait for the session to settle, with a spinner
    pub async fn settled(&self) -> Result<SessionState> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Loading session...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let state = self.session.settled(SETTLE_TIMEOUT).await;
        spinner.finish_and_clear();

        state.context("Timed out waiting for the session")
    }

    /// Current route once the session has settled
    pub async fn route(&self) -> Result<Route> {
        Ok(route(&self.settled().await?))
    }

    /// Route once a signed-in identity has been resolved
    pub async fn signed_in_route(&self) -> Result<Route> {
        let mut watch = self.session.watch();
        let wait = watch.wait_for(|s| s.user().is_some() && !s.is_initializing());
        let state = tokio::time::timeout(SETTLE_TIMEOUT, wait)
            .await
            .context("Timed out waiting for the session")?
            .context("Session listener stopped")?
            .clone();
        Ok(route(&state))
    }

    /// Route of the signed-in user, if `screen` belongs to their tree
    pub async fn require(&self, screen: Screen) -> Result<Route> {
        let route = self.route().await?;
        if route.allows(screen) {
            return Ok(route);
        }

        match &route {
            Route::Auth => bail!("You are not logged in. Use 'gym-coach login' first."),
            Route::Loading => bail!("The session is still loading."),
            Route::UnknownRole(_) | Route::ProfileError(_) => {
                bail!("{}", route.placeholder().unwrap_or_default())
            }
            _ => bail!("'{}' is not available to the {} role.", screen, route),
        }
    }
}
