//! Task Manager Component
//!
//! Owns the task list subscription: it is opened on mount and released
//! when the component is disposed.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{ErrorBanner, StatsPanel, TaskForm, TaskList};
use crate::context::use_app_context;
use crate::domain::UserInfo;

#[component]
pub fn TaskManager(user: UserInfo) -> impl IntoView {
    let ctx = use_app_context();
    let session = ctx.session;
    let sync = ctx.task_list();

    let subscription = StoredValue::new_local(Some(sync.activate()));
    on_cleanup(move || {
        subscription.update_value(|subscription| {
            if let Some(subscription) = subscription.take() {
                subscription.unsubscribe();
            }
        })
    });

    let sign_out = move |_| {
        spawn_local(async move {
            session.logout().await;
        });
    };
    let banner = Signal::derive(move || sync.banner());
    let display_name = user.email.unwrap_or(user.uid);

    view! {
        <div class="app-card">
            <header class="app-header">
                <h1 class="app-title">"Firestore Task Manager"</h1>
                <div class="session-bar">
                    <span class="muted-text">{display_name}</span>
                    <button
                        class="btn btn-secondary"
                        disabled=move || session.is_working()
                        on:click=sign_out
                    >
                        "Sign out"
                    </button>
                </div>
            </header>

            <ErrorBanner message=banner />

            <main class="app-main">
                <TaskForm sync=sync />
                <StatsPanel sync=sync />
            </main>

            <TaskList sync=sync />

            <footer class="footer"></footer>
        </div>
    }
}
