//! Login Form Component
//!
//! Email/password form with login and register actions.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::ErrorBanner;
use crate::context::use_app_context;
use crate::domain::Credentials;

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_app_context();
    let session = ctx.session;

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let authenticate = move |register: bool| {
        let credentials = Credentials::new(email.get_untracked(), password.get_untracked());
        spawn_local(async move {
            if register {
                session.register(credentials).await;
            } else {
                session.login(credentials).await;
            }
        });
    };
    let label = move |idle: &'static str| if session.is_working() { "Working..." } else { idle };

    view! {
        <div class="app-card auth-card">
            <header class="app-header">
                <h1 class="app-title">"Firestore Task Manager"</h1>
                <p class="section-description">
                    "Sign in or create an account to manage your tasks."
                </p>
            </header>

            <ErrorBanner message=Signal::derive(move || session.error()) />

            {ctx.demo.then(|| view! {
                <p class="muted-text">"Demo mode: accounts and tasks live only in this tab."</p>
            })}

            <main class="app-main">
                <div class="task-form-section">
                    <div class="field-group">
                        <label for="email">"Email"</label>
                        <input
                            id="email"
                            type="email"
                            placeholder="you@example.com"
                            autocomplete="email"
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="field-group">
                        <label for="password">"Password"</label>
                        <input
                            id="password"
                            type="password"
                            placeholder="Your password"
                            autocomplete="current-password"
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="auth-actions">
                        <button
                            class="btn btn-primary"
                            disabled=move || session.is_working()
                            on:click=move |_| authenticate(false)
                        >
                            {move || label("Login")}
                        </button>
                        <button
                            class="btn btn-secondary"
                            disabled=move || session.is_working()
                            on:click=move |_| authenticate(true)
                        >
                            {move || label("Register")}
                        </button>
                    </div>
                </div>
            </main>
        </div>
    }
}
