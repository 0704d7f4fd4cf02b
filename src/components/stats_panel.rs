//! Stats Panel Component

use leptos::prelude::*;

use crate::view_model::TaskListSync;

/// Total / completed / pending counts of the mirror
#[component]
pub fn StatsPanel(sync: TaskListSync) -> impl IntoView {
    let stats = Memo::new(move |_| sync.stats());

    view! {
        <section class="stats-section">
            <h2 class="section-title">"Overview"</h2>
            <p class="section-description">"Quick snapshot of your current workload."</p>
            <div class="stats-grid">
                <div class="stat-card">
                    <span class="stat-label">"Total"</span>
                    <span class="stat-value">{move || stats.get().total}</span>
                </div>
                <div class="stat-card stat-card-completed">
                    <span class="stat-label">"Completed"</span>
                    <span class="stat-value">{move || stats.get().completed}</span>
                </div>
                <div class="stat-card stat-card-pending">
                    <span class="stat-label">"Pending"</span>
                    <span class="stat-value">{move || stats.get().pending}</span>
                </div>
            </div>
        </section>
    }
}
