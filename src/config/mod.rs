use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::{CollectionPath, DocumentPath};
use crate::progress::MAX_WINDOW_WEEKS;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "GYM_COACH_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub firebase: FirebaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub collections: CollectionsConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub progress: ProgressConfig,

    /// File this config was loaded from; `save` writes back to it
    #[serde(skip)]
    source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseConfig {
    #[serde(default)]
    pub project_id: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_firestore_url")]
    pub firestore_url: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Persisted session of the signed-in user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub id_token: String,

    #[serde(default)]
    pub refresh_token: String,

    #[serde(default)]
    pub uid: String,

    #[serde(default)]
    pub email: String,
}

/// Collection names of the backend schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default = "default_users_collection")]
    pub users: String,

    #[serde(default = "default_routines_collection")]
    pub routines: String,

    #[serde(default = "default_progress_collection")]
    pub progress: String,

    /// Top-level collection holding progress logs, when it is not `users`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_parent: Option<String>,

    #[serde(default = "default_injuries_collection")]
    pub injuries: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default = "default_date_format")]
    pub date_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Reporting window of the progress charts, in weeks
    #[serde(default = "default_window_weeks")]
    pub window_weeks: u32,
}

// Default value functions
fn default_firestore_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_auth_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_token_url() -> String {
    "https://securetoken.googleapis.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_users_collection() -> String {
    "usuarios".to_string()
}

fn default_routines_collection() -> String {
    "routine".to_string()
}

fn default_progress_collection() -> String {
    "progress".to_string()
}

fn default_injuries_collection() -> String {
    "injuries".to_string()
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_window_weeks() -> u32 {
    crate::progress::DEFAULT_WINDOW_WEEKS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            firebase: FirebaseConfig::default(),
            auth: AuthConfig::default(),
            collections: CollectionsConfig::default(),
            ui: UiConfig::default(),
            progress: ProgressConfig::default(),
            source: None,
        }
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            api_key: String::new(),
            firestore_url: default_firestore_url(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            users: default_users_collection(),
            routines: default_routines_collection(),
            progress: default_progress_collection(),
            progress_parent: None,
            injuries: default_injuries_collection(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            date_format: default_date_format(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            window_weeks: default_window_weeks(),
        }
    }
}

impl CollectionsConfig {
    pub fn users(&self) -> CollectionPath {
        CollectionPath::root(&self.users)
    }

    pub fn profile(&self, uid: &str) -> DocumentPath {
        self.users().doc(uid)
    }

    pub fn routines(&self, student_id: &str) -> CollectionPath {
        self.profile(student_id).collection(&self.routines)
    }

    pub fn progress(&self, student_id: &str) -> CollectionPath {
        let parent = match &self.progress_parent {
            Some(parent) => CollectionPath::root(parent).doc(student_id),
            None => self.profile(student_id),
        };
        parent.collection(&self.progress)
    }

    pub fn injuries(&self, student_id: &str) -> CollectionPath {
        self.profile(student_id).collection(&self.injuries)
    }
}

impl Config {
    /// Get config directory path (~/.gym-coach/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".gym-coach"))
    }

    /// Get config file path, honouring `GYM_COACH_CONFIG`
    pub fn config_file() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_file()?)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self {
                source: Some(path),
                ..Self::default()
            });
        }

        let contents = fs::read_to_string(&path).context("Failed to read config file")?;
        let mut config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        config.source = Some(path);

        Ok(config)
    }

    /// Save configuration to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        let config_file = match &self.source {
            Some(path) => path.clone(),
            None => Self::config_file()?,
        };
        self.save_to(&config_file)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, config_file: &Path) -> Result<()> {
        if let Some(dir) = config_file.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(config_file, contents).context("Failed to write config file")?;

        Ok(())
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }

    /// Check if a session is persisted
    pub fn is_authenticated(&self) -> bool {
        !self.auth.id_token.is_empty() && !self.auth.uid.is_empty()
    }

    /// Persist a fresh session
    pub fn set_session(
        &mut self,
        uid: String,
        email: String,
        id_token: String,
        refresh_token: String,
    ) {
        self.auth.uid = uid;
        self.auth.email = email;
        self.auth.id_token = id_token;
        self.auth.refresh_token = refresh_token;
    }

    /// Update tokens after a refresh
    pub fn set_tokens(&mut self, id_token: String, refresh_token: String) {
        self.auth.id_token = id_token;
        self.auth.refresh_token = refresh_token;
    }

    /// Clear the persisted session
    pub fn clear_session(&mut self) {
        self.auth = AuthConfig::default();
    }

    /// Check the backend is configured enough to talk to
    pub fn validate(&self) -> Result<()> {
        if self.firebase.project_id.trim().is_empty() {
            anyhow::bail!("firebase.project_id is not set");
        }
        if self.firebase.api_key.trim().is_empty() {
            anyhow::bail!("firebase.api_key is not set");
        }
        if !(1..=MAX_WINDOW_WEEKS).contains(&self.progress.window_weeks) {
            anyhow::bail!("progress.window_weeks must be between 1 and {}", MAX_WINDOW_WEEKS);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.firebase.firestore_url, "https://firestore.googleapis.com/v1");
        assert_eq!(config.firebase.timeout_seconds, 30);
        assert_eq!(config.collections.users, "usuarios");
        assert_eq!(config.progress.window_weeks, 4);
        assert!(!config.is_authenticated());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.firebase.auth_url, deserialized.firebase.auth_url);
        assert_eq!(config.ui.date_format, deserialized.ui.date_format);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[firebase]\nproject_id = \"gym\"\n").unwrap();
        assert_eq!(config.firebase.project_id, "gym");
        assert_eq!(config.collections.injuries, "injuries");
    }

    #[test]
    fn test_save_writes_back_to_source() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::load_from(&path)?;
        config.set_session(
            "u1".to_string(),
            "a@b.c".to_string(),
            "id".to_string(),
            "refresh".to_string(),
        );
        config.save()?;

        let reloaded = Config::load_from(&path)?;
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.auth.uid, "u1");

        Ok(())
    }

    #[test]
    #[serial]
    fn test_config_file_honours_env() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("custom.toml");

        std::env::set_var(CONFIG_ENV, &path);
        let resolved = Config::config_file();
        std::env::remove_var(CONFIG_ENV);

        assert_eq!(resolved?, path);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_config_file_defaults_to_home() -> Result<()> {
        std::env::remove_var(CONFIG_ENV);
        let path = Config::config_file()?;
        assert!(path.ends_with(".gym-coach/config.toml"));
        Ok(())
    }

    #[test]
    fn test_collection_paths() {
        let collections = CollectionsConfig::default();
        assert_eq!(collections.profile("t1").as_str(), "usuarios/t1");
        assert_eq!(collections.routines("s1").as_str(), "usuarios/s1/routine");
        assert_eq!(collections.progress("s1").as_str(), "usuarios/s1/progress");
    }

    #[test]
    fn test_progress_parent_override() {
        let config: Config =
            toml::from_str("[collections]\nprogress_parent = \"users\"\n").unwrap();
        assert_eq!(config.collections.progress("s1").as_str(), "users/s1/progress");
        assert_eq!(config.collections.routines("s1").as_str(), "usuarios/s1/routine");
    }

    #[test]
    fn test_validate_requires_project() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.firebase.project_id = "gym".to_string();
        config.firebase.api_key = "key".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds_window() {
        let mut config = Config::default();
        config.firebase.project_id = "gym".to_string();
        config.firebase.api_key = "key".to_string();

        config.progress.window_weeks = 0;
        assert!(config.validate().is_err());

        config.progress.window_weeks = 20_000_000;
        assert!(config.validate().is_err());

        config.progress.window_weeks = MAX_WINDOW_WEEKS;
        assert!(config.validate().is_ok());
    }
}
