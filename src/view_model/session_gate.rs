//! Session Gate
//!
//! Tracks whether a user is signed in and runs the login/register/logout
//! actions. Failed actions leave the auth state alone and only set the
//! banner message.

use std::fmt;
use std::rc::Rc;

use leptos::prelude::*;
use reactive_stores::Store;

use super::ActionOutcome;
use crate::backend::{AuthClient, Subscription};
use crate::domain::{AuthError, AuthErrorCode, AuthState, Credentials, UserInfo};

#[derive(Clone, Debug, Default, Store)]
pub struct SessionState {
    pub auth: AuthState,
    /// Banner message
    pub error: Option<String>,
    /// An auth request is in flight
    pub working: bool,
}

#[derive(Debug, Clone, Copy)]
enum AuthAction {
    Login,
    Register,
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthAction::Login => f.write_str("login"),
            AuthAction::Register => f.write_str("register"),
        }
    }
}

/// View model deciding between the login form and the task manager
#[derive(Clone, Copy)]
pub struct SessionGate {
    client: StoredValue<Rc<dyn AuthClient>, LocalStorage>,
    state: Store<SessionState>,
}

impl SessionGate {
    pub fn new(client: Rc<dyn AuthClient>) -> Self {
        Self {
            client: StoredValue::new_local(client),
            state: Store::new(SessionState::default()),
        }
    }

    /// Follow the provider's auth state; the first report ends `Pending`
    pub fn start(&self) -> Subscription {
        let state = self.state;
        self.client
            .get_value()
            .on_auth_state_changed(Box::new(move |user: Option<UserInfo>| {
                let next = AuthState::from_user(user);
                match next.user() {
                    Some(user) => log::info!("auth state: signed in as {}", user.uid),
                    None => log::info!("auth state: signed out"),
                }
                state.auth().set(next);
            }))
    }

    pub fn auth_state(&self) -> AuthState {
        self.state.auth().get()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error().get()
    }

    pub fn clear_error(&self) {
        self.state.error().set(None);
    }

    pub fn is_working(&self) -> bool {
        self.state.working().get()
    }

    pub async fn login(&self, credentials: Credentials) -> ActionOutcome {
        self.authenticate(AuthAction::Login, &credentials).await
    }

    pub async fn register(&self, credentials: Credentials) -> ActionOutcome {
        self.authenticate(AuthAction::Register, &credentials).await
    }

    pub async fn logout(&self) -> ActionOutcome {
        if !self.begin() {
            return ActionOutcome::Skipped;
        }
        let result = self.client.get_value().logout().await;
        self.state.working().set(false);

        match result {
            Ok(()) => {
                log::info!("signed out");
                self.state.auth().set(AuthState::SignedOut);
                ActionOutcome::Done
            }
            Err(err) => {
                log::warn!("logout failed: {err}");
                self.state
                    .error()
                    .set(Some(AuthErrorCode::FALLBACK_MESSAGE.to_string()));
                ActionOutcome::Failed
            }
        }
    }

    async fn authenticate(&self, action: AuthAction, credentials: &Credentials) -> ActionOutcome {
        if !self.begin() {
            return ActionOutcome::Skipped;
        }
        let client = self.client.get_value();
        let result = match action {
            AuthAction::Login => client.login(credentials).await,
            AuthAction::Register => client.register(credentials).await,
        };
        self.state.working().set(false);

        match result {
            Ok(user) => {
                log::info!("{action} succeeded for {}", user.uid);
                self.state.auth().set(AuthState::SignedIn(user));
                ActionOutcome::Done
            }
            Err(err) => self.fail(action, &err),
        }
    }

    /// Clear the banner and mark a request in flight; false if one already is
    fn begin(&self) -> bool {
        if self.state.working().get_untracked() {
            log::debug!("auth request already in flight");
            return false;
        }
        self.state.working().set(true);
        self.state.error().set(None);
        true
    }

    fn fail(&self, action: AuthAction, err: &AuthError) -> ActionOutcome {
        log::warn!("{action} failed: {err}");
        self.state.error().set(Some(err.user_message().to_string()));
        ActionOutcome::Failed
    }
}
