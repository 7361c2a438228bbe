//! Profile settings of the signed-in user

use crate::backend::{AuthProvider, DocumentStore, Fields};
use crate::config::CollectionsConfig;
use crate::error::{AppError, Result, ValidationError};
use crate::models::profile::FIELD_NAME;
use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Profile summary of the session; `None` unless fully signed in
pub fn view(session: &SessionState) -> Option<SettingsView> {
    let SessionState::SignedIn {
        user,
        profile,
        role,
    } = session
    else {
        return None;
    };

    Some(SettingsView {
        name: profile
            .display_name
            .clone()
            .unwrap_or_else(|| "(no name)".to_string()),
        email: profile
            .email
            .clone()
            .or_else(|| user.email.clone())
            .unwrap_or_default(),
        role: role.to_string(),
    })
}

pub async fn update_display_name(
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    uid: Option<&str>,
    name: &str,
) -> Result<()> {
    let uid = uid.ok_or(AppError::Unauthenticated)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyDisplayName.into());
    }

    let mut fields = Fields::new();
    fields.insert(FIELD_NAME.to_string(), name.into());
    store.update_fields(&collections.profile(uid), fields).await?;

    tracing::info!("Updated display name of {}", uid);
    Ok(())
}

pub async fn sign_out(auth: &dyn AuthProvider) -> Result<()> {
    auth.sign_out().await?;
    Ok(())
}
