//! Domain Errors
//!
//! Store, auth and validation failures, and their mapping to the
//! messages shown in the error banner.

use std::fmt;

use thiserror::Error;

/// Common result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Rejected input, caught before any request is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task title is required")]
    EmptyTitle,
}

/// Failure reported by the document store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("{code}: {message}")]
    Backend { code: String, message: String },
}

impl StoreError {
    /// Map a provider error code (e.g. `permission-denied`) to a variant
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code.trim_start_matches("firestore/") {
            "permission-denied" => Self::PermissionDenied(message),
            "not-found" => Self::NotFound(message),
            "unavailable" => Self::Unavailable(message),
            other => Self::Backend {
                code: other.to_string(),
                message,
            },
        }
    }
}

/// The store action a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Load,
    Add,
    Update,
    Delete,
}

impl StoreOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOperation::Load => "load",
            StoreOperation::Add => "add",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
        }
    }

    /// Banner message for a failed operation
    pub fn failure_message(&self) -> &'static str {
        match self {
            StoreOperation::Load => "Failed to load tasks. Please try again.",
            StoreOperation::Add => "Failed to add task. Please try again.",
            StoreOperation::Update => "Failed to update task. Please try again.",
            StoreOperation::Delete => "Failed to delete task. Please try again.",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known auth provider error codes
///
/// Unrecognized codes land in `Other` and render the fallback message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    ConfigurationNotFound,
    UserNotFound,
    WrongPassword,
    EmailAlreadyInUse,
    InvalidEmail,
    WeakPassword,
    Other(String),
}

impl AuthErrorCode {
    pub const FALLBACK_MESSAGE: &'static str = "Something went wrong. Please try again.";

    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/configuration-not-found" => Self::ConfigurationNotFound,
            "auth/user-not-found" => Self::UserNotFound,
            "auth/wrong-password" => Self::WrongPassword,
            "auth/email-already-in-use" => Self::EmailAlreadyInUse,
            "auth/invalid-email" => Self::InvalidEmail,
            "auth/weak-password" => Self::WeakPassword,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            Self::ConfigurationNotFound => "auth/configuration-not-found",
            Self::UserNotFound => "auth/user-not-found",
            Self::WrongPassword => "auth/wrong-password",
            Self::EmailAlreadyInUse => "auth/email-already-in-use",
            Self::InvalidEmail => "auth/invalid-email",
            Self::WeakPassword => "auth/weak-password",
            Self::Other(code) => code,
        }
    }

    /// Human-readable message; total over all codes
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ConfigurationNotFound => {
                "Authentication is not fully configured. Make sure Email/Password sign-in is enabled in Firebase Console."
            }
            Self::UserNotFound => "No account found with that email.",
            Self::WrongPassword => "Incorrect password. Please try again.",
            Self::EmailAlreadyInUse => "This email is already in use.",
            Self::InvalidEmail => "Please enter a valid email address.",
            Self::WeakPassword => "Password is too weak. Try a stronger one.",
            Self::Other(_) => Self::FALLBACK_MESSAGE,
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Failure reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("auth failed ({code}): {message}")]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub message: String,
}

impl AuthError {
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::from_code(code), message)
    }

    pub fn user_message(&self) -> &'static str {
        self.code.user_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_password_message() {
        let err = AuthError::from_code("auth/wrong-password", "INVALID_PASSWORD");
        assert_eq!(err.user_message(), "Incorrect password. Please try again.");
    }

    #[test]
    fn test_known_codes_round_trip() {
        for code in [
            "auth/configuration-not-found",
            "auth/user-not-found",
            "auth/wrong-password",
            "auth/email-already-in-use",
            "auth/invalid-email",
            "auth/weak-password",
        ] {
            let parsed = AuthErrorCode::from_code(code);
            assert!(!matches!(parsed, AuthErrorCode::Other(_)), "{code}");
            assert_eq!(parsed.as_code(), code);
            assert_ne!(parsed.user_message(), AuthErrorCode::FALLBACK_MESSAGE);
        }
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let code = AuthErrorCode::from_code("auth/too-many-requests");
        assert_eq!(code, AuthErrorCode::Other("auth/too-many-requests".into()));
        assert_eq!(code.user_message(), "Something went wrong. Please try again.");
        assert_eq!(AuthErrorCode::from_code("").user_message(), AuthErrorCode::FALLBACK_MESSAGE);
    }

    #[test]
    fn test_store_error_from_code() {
        assert_eq!(
            StoreError::from_code("permission-denied", "rules"),
            StoreError::PermissionDenied("rules".into())
        );
        assert_eq!(
            StoreError::from_code("firestore/unavailable", "offline"),
            StoreError::Unavailable("offline".into())
        );
        assert!(matches!(
            StoreError::from_code("aborted", "x"),
            StoreError::Backend { ref code, .. } if code == "aborted"
        ));
    }

    #[test]
    fn test_operation_messages() {
        assert_eq!(
            StoreOperation::Load.failure_message(),
            "Failed to load tasks. Please try again."
        );
        assert_eq!(
            StoreOperation::Delete.failure_message(),
            "Failed to delete task. Please try again."
        );
    }
}
