//! Login and self-registration

use regex::Regex;
use std::sync::OnceLock;

use crate::backend::{AuthProvider, AuthUser, DocumentStore};
use crate::config::CollectionsConfig;
use crate::error::{Result, ValidationError};
use crate::models::{Role, ToFields, UserProfile};

pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email_pattern().is_some_and(|pattern| pattern.is_match(email.trim())) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::WeakPassword(MIN_PASSWORD_LEN));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(())
    }
}

/// Sign in; the session context picks the identity up from the auth stream
pub async fn login(auth: &dyn AuthProvider, form: &LoginForm) -> Result<AuthUser> {
    form.validate()?;
    let user = auth.sign_in(form.email.trim(), &form.password).await?;
    Ok(user)
}

/// New account details; used for students and, by the administrator, trainers
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyDisplayName);
        }
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

/// Create the auth identity and its profile document with the given role.
/// The current session is left untouched.
pub async fn create_profile(
    auth: &dyn AuthProvider,
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    form: &RegisterForm,
    role: Role,
) -> Result<UserProfile> {
    form.validate()?;

    let email = form.email.trim();
    let user = auth.create_account(email, &form.password).await?;

    let mut profile = UserProfile::new(&user.uid, role);
    profile.display_name = Some(form.name.trim().to_string());
    profile.email = Some(email.to_string());

    store
        .set_document(&collections.profile(&user.uid), profile.to_fields())
        .await
        .map_err(|e| {
            tracing::error!("Account {} created but its profile was not written: {}", user.uid, e);
            e
        })?;

    tracing::info!("Registered {} as {}", user.uid, profile.resolved_role());
    Ok(profile)
}

/// Self-registration: the new account is a student, signed in once its
/// profile exists
pub async fn register(
    auth: &dyn AuthProvider,
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    form: &RegisterForm,
) -> Result<AuthUser> {
    create_profile(auth, store, collections, form, Role::Student).await?;
    let user = auth.sign_in(form.email.trim(), &form.password).await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryAuth, MemoryStore};
    use crate::backend::{AuthError, FieldValue};
    use crate::error::AppError;

    fn form(name: &str, email: &str, password: &str) -> RegisterForm {
        RegisterForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_validation() {
        assert_eq!(
            form("", "a@b.co", "secret1").validate(),
            Err(ValidationError::EmptyDisplayName)
        );
        assert_eq!(
            form("Ana", "not-an-email", "secret1").validate(),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            form("Ana", "ana@gym.test", "12345").validate(),
            Err(ValidationError::WeakPassword(6))
        );
        assert!(form("Ana", " ana@gym.test ", "123456").validate().is_ok());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let login = LoginForm {
            email: "ana@gym.test".to_string(),
            password: String::new(),
        };
        assert_eq!(login.validate(), Err(ValidationError::MissingCredentials));
    }

    #[tokio::test]
    async fn test_register_writes_profile_then_signs_in() {
        let auth = MemoryAuth::new();
        let store = MemoryStore::new();
        let collections = CollectionsConfig::default();

        let user = register(&auth, &store, &collections, &form("Ana", "ana@gym.test", "secret1"))
            .await
            .unwrap();

        assert_eq!(auth.current_user(), Some(user.clone()));
        let fields = store.fields(&collections.profile(&user.uid)).unwrap();
        assert_eq!(fields.get("role"), Some(&FieldValue::string("alumno")));
        assert_eq!(fields.get("nombre"), Some(&FieldValue::string("Ana")));
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let auth = MemoryAuth::new();
        let store = MemoryStore::new();
        let collections = CollectionsConfig::default();
        let details = form("Ana", "ana@gym.test", "secret1");

        register(&auth, &store, &collections, &details).await.unwrap();
        let writes = store.write_count();

        let result = register(&auth, &store, &collections, &details).await;
        assert_eq!(result, Err(AppError::Auth(AuthError::EmailAlreadyExists)));
        assert_eq!(store.write_count(), writes);
    }
}
