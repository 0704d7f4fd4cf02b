//! UI Components
//!
//! Leptos components for the login and task manager screens.

mod error_banner;
mod login_form;
mod stats_panel;
mod task_card;
mod task_form;
mod task_list;
mod task_manager;

pub use error_banner::ErrorBanner;
pub use login_form::LoginForm;
pub use stats_panel::StatsPanel;
pub use task_card::TaskCard;
pub use task_form::TaskForm;
pub use task_list::TaskList;
pub use task_manager::TaskManager;
