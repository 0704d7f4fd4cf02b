//! Task List Sync
//!
//! Live mirror of the remote task collection. The mirror is replaced
//! wholesale by every snapshot and is never edited locally: mutations go
//! to the store and come back through the subscription.

use std::collections::BTreeSet;
use std::rc::Rc;

use leptos::prelude::*;
use reactive_stores::Store;

use super::{ActionOutcome, SessionGate};
use crate::backend::{DocumentStore, ErrorCallback, SnapshotCallback, Subscription};
use crate::domain::{NewTask, OrderSpec, StoreError, StoreOperation, Task, TaskId, TaskPatch, TaskStats};

/// Reactive state of the task manager screen
#[derive(Clone, Debug, Default, Store)]
pub struct TaskListState {
    /// Mirror of the latest snapshot, newest first
    pub tasks: Vec<Task>,
    /// True until the first snapshot or subscription error arrives
    pub loading: bool,
    /// Banner message
    pub error: Option<String>,
    /// Title input buffer
    pub title: String,
    /// Description input buffer
    pub description: String,
    /// A create request is in flight
    pub submitting: bool,
    /// Tasks with a toggle or delete request in flight
    pub in_flight: BTreeSet<TaskId>,
}

/// View model for the task manager
#[derive(Clone, Copy)]
pub struct TaskListSync {
    client: StoredValue<Rc<dyn DocumentStore>, LocalStorage>,
    collection: StoredValue<String>,
    state: Store<TaskListState>,
    /// Session whose banner shares the task screen
    session: Option<SessionGate>,
}

/// Replace the task screen banner; a stale session message goes with it
fn set_banner(state: Store<TaskListState>, session: Option<SessionGate>, message: Option<String>) {
    state.error().set(message);
    if let Some(session) = session {
        session.clear_error();
    }
}

impl TaskListSync {
    pub fn new(client: Rc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            client: StoredValue::new_local(client),
            collection: StoredValue::new(collection.into()),
            state: Store::new(TaskListState {
                loading: true,
                ..Default::default()
            }),
            session: None,
        }
    }

    /// Share the banner with `session`
    pub fn with_session(mut self, session: SessionGate) -> Self {
        self.session = Some(session);
        self
    }

    /// Subscribe to the collection, newest first
    ///
    /// The listener lives as long as the returned handle; callers hold it
    /// for the lifetime of the view.
    pub fn activate(&self) -> Subscription {
        let state = self.state;
        let session = self.session;
        let collection = self.collection.get_value();
        state.loading().set(true);

        let on_snapshot: SnapshotCallback = Box::new(move |tasks: Vec<Task>| {
            log::debug!("snapshot: {} tasks", tasks.len());
            state.tasks().set(tasks);
            state.loading().set(false);
        });
        // The mirror keeps its last value on failure
        let on_error: ErrorCallback = Box::new(move |err: StoreError| {
            log::error!("Failed to load tasks: {err}");
            set_banner(state, session, Some(StoreOperation::Load.failure_message().to_string()));
            state.loading().set(false);
        });

        log::info!("subscribing to {collection}");
        self.client
            .get_value()
            .subscribe(&collection, &OrderSpec::created_desc(), on_snapshot, on_error)
    }

    // ========================
    // Reads
    // ========================

    pub fn tasks(&self) -> Vec<Task> {
        self.state.tasks().get()
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.state.tasks().read())
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading().get()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error().get()
    }

    /// Message for the task screen banner
    ///
    /// Task actions clear the session message, so one that is still set is
    /// the most recent.
    pub fn banner(&self) -> Option<String> {
        self.session
            .and_then(|session| session.error())
            .or_else(|| self.error())
    }

    pub fn title(&self) -> String {
        self.state.title().get()
    }

    pub fn description(&self) -> String {
        self.state.description().get()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.submitting().get()
    }

    /// Add button state: a non-blank title and no create in flight
    pub fn can_submit(&self) -> bool {
        !self.state.submitting().get() && !self.state.title().read().trim().is_empty()
    }

    pub fn is_busy(&self, id: &TaskId) -> bool {
        self.state.in_flight().read().contains(id)
    }

    /// Placeholder text for an empty list
    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.state.tasks().read().is_empty() {
            return None;
        }
        if self.is_loading() {
            Some("Loading tasks...")
        } else {
            Some("No tasks yet. Add one to get started.")
        }
    }

    // ========================
    // Form Input
    // ========================

    pub fn set_title(&self, title: String) {
        self.state.title().set(title);
    }

    pub fn set_description(&self, description: String) {
        self.state.description().set(description);
    }

    // ========================
    // Mutations
    // ========================

    /// Create a task from the form buffers
    pub async fn submit(&self) -> ActionOutcome {
        let title = self.state.title().get_untracked();
        let description = self.state.description().get_untracked();
        self.add_task(&title, &description).await
    }

    /// Create a task; a blank title issues nothing and keeps the inputs
    pub async fn add_task(&self, title: &str, description: &str) -> ActionOutcome {
        let task = match NewTask::new(title, description) {
            Ok(task) => task,
            Err(err) => {
                log::debug!("add skipped: {err}");
                return ActionOutcome::Skipped;
            }
        };
        if self.state.submitting().get_untracked() {
            log::debug!("add skipped: create already in flight");
            return ActionOutcome::Skipped;
        }

        self.state.submitting().set(true);
        let collection = self.collection.get_value();
        let result = self.client.get_value().create(&collection, &task).await;
        self.state.submitting().set(false);

        match result {
            Ok(()) => {
                self.state.title().set(String::new());
                self.state.description().set(String::new());
                set_banner(self.state, self.session, None);
                ActionOutcome::Done
            }
            Err(err) => self.fail(StoreOperation::Add, &err),
        }
    }

    /// Flip `completed`; the mirror changes only when the snapshot arrives
    pub async fn toggle_task(&self, task: &Task) -> ActionOutcome {
        if !self.begin(&task.id) {
            return ActionOutcome::Skipped;
        }
        let collection = self.collection.get_value();
        let patch = TaskPatch::toggle(task);
        let result = self.client.get_value().update(&collection, &task.id, &patch).await;
        self.finish(&task.id);

        match result {
            Ok(()) => self.succeed(),
            Err(err) => self.fail(StoreOperation::Update, &err),
        }
    }

    pub async fn delete_task(&self, id: &TaskId) -> ActionOutcome {
        if !self.begin(id) {
            return ActionOutcome::Skipped;
        }
        let collection = self.collection.get_value();
        let result = self.client.get_value().delete(&collection, id).await;
        self.finish(id);

        match result {
            Ok(()) => self.succeed(),
            Err(err) => self.fail(StoreOperation::Delete, &err),
        }
    }

    /// Mark `id` in flight; false if it already was
    fn begin(&self, id: &TaskId) -> bool {
        if self.state.in_flight().with_untracked(|set| set.contains(id)) {
            log::debug!("skipped: request for {id} already in flight");
            return false;
        }
        self.state.in_flight().update(|set| {
            set.insert(id.clone());
        });
        true
    }

    fn finish(&self, id: &TaskId) {
        self.state.in_flight().update(|set| {
            set.remove(id);
        });
    }

    fn succeed(&self) -> ActionOutcome {
        set_banner(self.state, self.session, None);
        ActionOutcome::Done
    }

    fn fail(&self, operation: StoreOperation, err: &StoreError) -> ActionOutcome {
        log::error!("Failed to {operation} task: {err}");
        set_banner(
            self.state,
            self.session,
            Some(operation.failure_message().to_string()),
        );
        ActionOutcome::Failed
    }
}
