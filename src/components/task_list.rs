//! Task List Component
//!
//! Re-renders every card from the mirror on each snapshot.

use leptos::prelude::*;

use crate::components::TaskCard;
use crate::view_model::TaskListSync;

#[component]
pub fn TaskList(sync: TaskListSync) -> impl IntoView {
    view! {
        <section class="task-list-section">
            <div class="task-list-header">
                <h2 class="section-title">"Tasks"</h2>
                <p class="section-description">"All updates sync in realtime across clients."</p>
            </div>
            <div class="task-list">
                {move || sync.empty_message().map(|text| view! { <p class="muted-text">{text}</p> })}
                {move || {
                    sync.tasks()
                        .into_iter()
                        .map(|task| view! { <TaskCard task=task sync=sync /> })
                        .collect_view()
                }}
            </div>
        </section>
    }
}
