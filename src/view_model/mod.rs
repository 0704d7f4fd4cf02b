//! View Models
//!
//! Reactive state behind the screens. Collaborators are injected, so the
//! same view models run against the browser bridge or the in-memory backend.

mod session_gate;
mod task_list;


pub use session_gate::SessionGate;
pub use task_list::TaskListSync;

/// What a user action ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The request was issued and succeeded
    Done,
    /// Nothing was issued: invalid input, or the same request is in flight
    Skipped,
    /// The request failed; the banner carries the message
    Failed,
}
