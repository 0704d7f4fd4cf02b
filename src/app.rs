//! Task Sync Frontend App
//!
//! Picks the backend, then routes between the login form and the task
//! manager on the session state.

use std::rc::Rc;

use leptos::prelude::*;

use crate::backend::{self, AuthClient, DocumentStore, MemoryAuth, MemoryStore};
use crate::components::{LoginForm, TaskManager};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::AuthState;
use crate::view_model::SessionGate;

struct Backends {
    store: Rc<dyn DocumentStore>,
    auth: Rc<dyn AuthClient>,
    demo: bool,
}

/// Hosted backend when configured and loaded, in-memory otherwise
fn connect_backends(config: &AppConfig) -> Backends {
    if config.is_demo() {
        log::info!("no backend configured, running in demo mode");
    } else if let Some(settings) = &config.backend {
        match backend::connect(settings) {
            Ok((store, auth)) => {
                return Backends {
                    store: Rc::new(store),
                    auth: Rc::new(auth),
                    demo: false,
                }
            }
            Err(err) => log::error!("backend unavailable, falling back to demo mode: {err}"),
        }
    }
    Backends {
        store: Rc::new(MemoryStore::new()),
        auth: Rc::new(MemoryAuth::new()),
        demo: true,
    }
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let backends = connect_backends(&config);
    let session = SessionGate::new(backends.auth);
    provide_context(AppContext::new(
        backends.store,
        config.collection.clone(),
        session,
        backends.demo,
    ));

    // Auth listener lives as long as the app
    let auth_listener = StoredValue::new_local(Some(session.start()));
    on_cleanup(move || {
        auth_listener.update_value(|listener| {
            if let Some(listener) = listener.take() {
                listener.unsubscribe();
            }
        })
    });

    let auth_state = Memo::new(move |_| session.auth_state());

    view! {
        <div class="app">
            <div class="app-inner">
                {move || match auth_state.get() {
                    AuthState::Pending => view! {
                        <div class="app-card">
                            <p class="muted-text">"Checking session..."</p>
                        </div>
                    }.into_any(),
                    AuthState::SignedOut => view! { <LoginForm /> }.into_any(),
                    AuthState::SignedIn(user) => view! { <TaskManager user=user /> }.into_any(),
                }}
            </div>
        </div>
    }
}
