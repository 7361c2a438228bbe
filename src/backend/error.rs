use reqwest::StatusCode;
use thiserror::Error;

/// Document store failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Malformed document {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl BackendError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        let msg = if message.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            message
        };

        match status {
            StatusCode::UNAUTHORIZED => BackendError::Unauthorized(msg),
            StatusCode::FORBIDDEN => BackendError::Unauthorized(msg),
            StatusCode::NOT_FOUND => BackendError::NotFound(msg),
            StatusCode::BAD_REQUEST => BackendError::BadRequest(msg),
            status if status.is_server_error() => BackendError::ServerError(msg),
            status if status.is_client_error() => BackendError::BadRequest(msg),
            _ => BackendError::Unknown(msg),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        BackendError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::NetworkError(err.to_string())
    }
}

/// Authentication service failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Session expired, sign in again")]
    TokenExpired,

    #[error("Not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl AuthError {
    /// Map an identity-toolkit error code (`EMAIL_EXISTS`, `WEAK_PASSWORD : ...`)
    pub fn from_code(status: StatusCode, message: &str) -> Self {
        let code = message.split(':').next().unwrap_or_default().trim();
        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                AuthError::InvalidCredentials
            }
            "EMAIL_EXISTS" => AuthError::EmailAlreadyExists,
            "INVALID_EMAIL" => AuthError::InvalidEmail(message.to_string()),
            "WEAK_PASSWORD" => AuthError::WeakPassword(message.to_string()),
            "USER_DISABLED" => AuthError::AccountDisabled,
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => AuthError::TokenExpired,
            _ => AuthError::Backend(BackendError::from_status(status, message.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_from_status() {
        let error = BackendError::from_status(StatusCode::UNAUTHORIZED, "Unauthorized".to_string());
        assert!(matches!(error, BackendError::Unauthorized(_)));

        let error = BackendError::from_status(StatusCode::NOT_FOUND, String::new());
        assert_eq!(error, BackendError::NotFound("Not Found".to_string()));

        let error = BackendError::from_status(StatusCode::SERVICE_UNAVAILABLE, "down".to_string());
        assert!(matches!(error, BackendError::ServerError(_)));

        let error = BackendError::from_status(StatusCode::CONFLICT, "conflict".to_string());
        assert!(matches!(error, BackendError::BadRequest(_)));
    }

    #[test]
    fn test_auth_error_codes() {
        assert_eq!(
            AuthError::from_code(StatusCode::BAD_REQUEST, "INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            AuthError::from_code(StatusCode::BAD_REQUEST, "EMAIL_EXISTS"),
            AuthError::EmailAlreadyExists
        );
        assert!(matches!(
            AuthError::from_code(
                StatusCode::BAD_REQUEST,
                "WEAK_PASSWORD : Password should be at least 6 characters"
            ),
            AuthError::WeakPassword(_)
        ));
        assert!(matches!(
            AuthError::from_code(StatusCode::INTERNAL_SERVER_ERROR, "BOOM"),
            AuthError::Backend(BackendError::ServerError(_))
        ));
    }
}
