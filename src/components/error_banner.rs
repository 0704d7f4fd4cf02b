//! Error Banner Component

use leptos::prelude::*;

/// Single banner line; hidden when there is no message
#[component]
pub fn ErrorBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div class="error-alert" role="alert">
                {move || message.get().unwrap_or_default()}
            </div>
        </Show>
    }
}
