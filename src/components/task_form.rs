//! Task Form Component
//!
//! Title and description inputs; the buffers live in the view model so a
//! failed create keeps what the user typed.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::view_model::TaskListSync;

#[component]
pub fn TaskForm(sync: TaskListSync) -> impl IntoView {
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        spawn_local(async move {
            sync.submit().await;
        });
    };

    view! {
        <section class="task-form-section">
            <h2 class="section-title">"Add New Task"</h2>
            <p class="section-description">
                "Capture your tasks with a title and optional description. Changes are saved instantly to Firestore."
            </p>
            <form class="task-form" on:submit=on_submit>
                <div class="field-group">
                    <label for="task-title">"Title"</label>
                    <input
                        id="task-title"
                        type="text"
                        placeholder="e.g. Prepare DBMS presentation"
                        autofocus=true
                        prop:value=move || sync.title()
                        on:input=move |ev| sync.set_title(event_target_value(&ev))
                    />
                </div>
                <div class="field-group">
                    <label for="task-description">"Description"</label>
                    <textarea
                        id="task-description"
                        placeholder="Optional details, links, or notes"
                        rows="3"
                        prop:value=move || sync.description()
                        on:input=move |ev| sync.set_description(event_target_value(&ev))
                    ></textarea>
                </div>
                <button type="submit" class="btn btn-primary" disabled=move || !sync.can_submit()>
                    {move || if sync.is_submitting() { "Adding..." } else { "Add Task" }}
                </button>
            </form>
        </section>
    }
}
