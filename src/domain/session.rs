//! Session Types
//!
//! Authentication state and the transient credentials used to change it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The signed-in user, kept for display only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Authentication state as seen by the session gate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Waiting for the provider's first auth-state report
    #[default]
    Pending,
    SignedIn(UserInfo),
    SignedOut,
}

impl AuthState {
    pub fn from_user(user: Option<UserInfo>) -> Self {
        match user {
            Some(user) => AuthState::SignedIn(user),
            None => AuthState::SignedOut,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn(_))
    }

    pub fn user(&self) -> Option<&UserInfo> {
        match self {
            AuthState::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

/// Email/password pair, never stored beyond the form
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
