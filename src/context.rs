//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use std::rc::Rc;

use leptos::prelude::*;

use crate::backend::DocumentStore;
use crate::view_model::{SessionGate, TaskListSync};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Document store shared by every task view
    store: StoredValue<Rc<dyn DocumentStore>, LocalStorage>,
    /// Remote collection holding the tasks
    collection: StoredValue<String>,
    /// Session state and auth actions
    pub session: SessionGate,
    /// Running against the in-memory backend
    pub demo: bool,
}

impl AppContext {
    pub fn new(store: Rc<dyn DocumentStore>, collection: String, session: SessionGate, demo: bool) -> Self {
        Self {
            store: StoredValue::new_local(store),
            collection: StoredValue::new(collection),
            session,
            demo,
        }
    }

    /// A fresh task list view model bound to the shared store
    pub fn task_list(&self) -> TaskListSync {
        TaskListSync::new(self.store.get_value(), self.collection.get_value()).with_session(self.session)
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
