//! Task Card Component
//!
//! One task with its toggle and delete actions. Neither action touches the
//! card directly; the next snapshot re-renders it.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::Task;
use crate::view_model::TaskListSync;

#[component]
pub fn TaskCard(task: Task, sync: TaskListSync) -> impl IntoView {
    let id = task.id.clone();
    let completed = task.completed;
    let title = task.title.clone();
    let description = task.description.clone();

    let busy = {
        let id = id.clone();
        move || sync.is_busy(&id)
    };

    let on_toggle = move |_| {
        let task = task.clone();
        spawn_local(async move {
            sync.toggle_task(&task).await;
        });
    };

    let on_delete = move |_| {
        let id = id.clone();
        spawn_local(async move {
            sync.delete_task(&id).await;
        });
    };

    view! {
        <article class=if completed { "task-card task-card-done" } else { "task-card" }>
            <div class="task-card-main">
                <div class="task-card-header">
                    <h3 class="task-title">{title}</h3>
                    <span class=if completed {
                        "task-badge task-badge-completed"
                    } else {
                        "task-badge task-badge-pending"
                    }>{if completed { "Completed" } else { "Pending" }}</span>
                </div>
                {description.map(|text| view! { <p class="task-description">{text}</p> })}
            </div>
            <div class="task-actions">
                <button class="btn btn-secondary" disabled=busy.clone() on:click=on_toggle>
                    {if completed { "Mark Pending" } else { "Mark Completed" }}
                </button>
                <button class="btn btn-danger" disabled=busy on:click=on_delete>
                    "Delete"
                </button>
            </div>
        </article>
    }
}
