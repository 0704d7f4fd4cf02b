//! Backend Layer - Core Traits
//!
//! Defines the abstract interfaces the view models depend on.
//! Implementations can use the browser bridge, in-memory state, etc.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{
    AuthError, Credentials, NewTask, OrderSpec, StoreError, StoreResult, Task, TaskId, TaskPatch,
    UserInfo,
};

/// Receives the full, ordered contents of a collection on every change
pub type SnapshotCallback = Box<dyn Fn(Vec<Task>)>;

/// Receives a subscription failure
pub type ErrorCallback = Box<dyn Fn(StoreError)>;

/// Receives the signed-in user, or `None` after sign-out
pub type AuthCallback = Box<dyn Fn(Option<UserInfo>)>;

/// Live listener handle; the listener is released when this is dropped
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Handle for a listener that never attached; `resources` live until release
    pub fn detached<T: 'static>(resources: T) -> Self {
        Self::new(move || drop(resources))
    }

    /// Release the listener now
    pub fn unsubscribe(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Realtime document store holding the task collection
///
/// All calls run on the single UI event loop, so futures are not `Send`.
#[async_trait(?Send)]
pub trait DocumentStore {
    /// Listen to `collection` in `order`; `on_snapshot` fires with the
    /// full current listing after every change
    fn subscribe(
        &self,
        collection: &str,
        order: &OrderSpec,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription;

    /// Create a task with `completed = false` and a server-assigned timestamp
    async fn create(&self, collection: &str, task: &NewTask) -> StoreResult<()>;

    /// Apply a partial update to one task
    async fn update(&self, collection: &str, id: &TaskId, patch: &TaskPatch) -> StoreResult<()>;

    /// Delete one task
    async fn delete(&self, collection: &str, id: &TaskId) -> StoreResult<()>;
}

/// Email/password authentication provider
#[async_trait(?Send)]
pub trait AuthClient {
    async fn login(&self, credentials: &Credentials) -> Result<UserInfo, AuthError>;

    async fn register(&self, credentials: &Credentials) -> Result<UserInfo, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    /// Observe sign-in state; fires once with the current state, then on changes
    fn on_auth_state_changed(&self, callback: AuthCallback) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_subscription_releases_on_drop() {
        let released = Rc::new(Cell::new(0));
        let counter = released.clone();
        let sub = Subscription::new(move || counter.set(counter.get() + 1));
        assert_eq!(released.get(), 0);
        drop(sub);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_subscription_releases_once() {
        let released = Rc::new(Cell::new(0));
        let counter = released.clone();
        let sub = Subscription::new(move || counter.set(counter.get() + 1));
        sub.unsubscribe();
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_detached_subscription_holds_resources_until_release() {
        let resource = Rc::new(());
        let sub = Subscription::detached((resource.clone(), "callback"));
        assert_eq!(Rc::strong_count(&resource), 2);
        sub.unsubscribe();
        assert_eq!(Rc::strong_count(&resource), 1);
    }
}
