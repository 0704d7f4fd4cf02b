//! In-Memory Backend
//!
//! Local store and auth provider with the same observable behavior as the
//! hosted ones: every write is followed by a full snapshot to each
//! listener. Used for local demo mode and by the view-model tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use chrono::Utc;

use super::traits::{AuthCallback, AuthClient, DocumentStore, ErrorCallback, SnapshotCallback, Subscription};
use crate::domain::{
    AuthError, AuthErrorCode, Credentials, NewTask, OrderSpec, StoreError, StoreResult, Task,
    TaskId, TaskPatch, UserInfo,
};

const MIN_PASSWORD_LEN: usize = 6;

// ========================
// Document Store
// ========================

struct StoredDoc {
    seq: u64,
    task: Task,
}

struct Listener {
    id: u64,
    collection: String,
    descending: bool,
    on_snapshot: Rc<dyn Fn(Vec<Task>)>,
    on_error: Rc<dyn Fn(StoreError)>,
}

#[derive(Default)]
struct StoreInner {
    collections: HashMap<String, Vec<StoredDoc>>,
    listeners: Vec<Listener>,
    next_seq: u64,
    next_listener: u64,
    /// Returned by every write while set
    write_failure: Option<StoreError>,
    /// Hold snapshots until `flush`
    paused: bool,
    create_calls: usize,
}

impl StoreInner {
    fn snapshot(&self, collection: &str, descending: bool) -> Vec<Task> {
        let mut docs: Vec<&StoredDoc> = self
            .collections
            .get(collection)
            .map(|docs| docs.iter().collect())
            .unwrap_or_default();
        docs.sort_by_key(|doc| (doc.task.created_at, doc.seq));
        if descending {
            docs.reverse();
        }
        docs.into_iter().map(|doc| doc.task.clone()).collect()
    }

    /// Pending deliveries for listeners of `collection`
    fn deliveries(&self, collection: &str) -> Vec<(Rc<dyn Fn(Vec<Task>)>, Vec<Task>)> {
        if self.paused {
            return Vec::new();
        }
        self.listeners
            .iter()
            .filter(|l| l.collection == collection)
            .map(|l| (l.on_snapshot.clone(), self.snapshot(collection, l.descending)))
            .collect()
    }
}

/// In-memory document store
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver snapshots outside of the borrow so listeners may call back in
    fn notify(&self, collection: &str) {
        let deliveries = self.inner.borrow().deliveries(collection);
        for (on_snapshot, tasks) in deliveries {
            on_snapshot(tasks);
        }
    }

    fn check_writable(&self) -> StoreResult<()> {
        match &self.inner.borrow().write_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl DocumentStore for MemoryStore {
    fn subscribe(
        &self,
        collection: &str,
        order: &OrderSpec,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_listener;
            inner.next_listener += 1;
            inner.listeners.push(Listener {
                id,
                collection: collection.to_string(),
                descending: order.is_descending(),
                on_snapshot: Rc::from(on_snapshot),
                on_error: Rc::from(on_error),
            });
            id
        };
        log::debug!("memory store: listener {id} attached to {collection}");

        let initial = {
            let inner = self.inner.borrow();
            let listener = inner.listeners.iter().find(|l| l.id == id);
            match (inner.paused, listener) {
                (false, Some(l)) => Some((l.on_snapshot.clone(), inner.snapshot(collection, l.descending))),
                _ => None,
            }
        };
        if let Some((on_snapshot, tasks)) = initial {
            on_snapshot(tasks);
        }

        let weak: Weak<RefCell<StoreInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|l| l.id != id);
                log::debug!("memory store: listener {id} released");
            }
        })
    }

    async fn create(&self, collection: &str, task: &NewTask) -> StoreResult<()> {
        self.inner.borrow_mut().create_calls += 1;
        self.check_writable()?;
        {
            let mut inner = self.inner.borrow_mut();
            let seq = inner.next_seq;
            inner.next_seq += 1;
            let mut stored = Task::new(TaskId::new(format!("task-{seq}")), task.title())
                .with_created_at(Utc::now());
            stored.description = task.description().map(str::to_string);
            inner
                .collections
                .entry(collection.to_string())
                .or_default()
                .push(StoredDoc { seq, task: stored });
        }
        self.notify(collection);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &TaskId, patch: &TaskPatch) -> StoreResult<()> {
        self.check_writable()?;
        {
            let mut inner = self.inner.borrow_mut();
            let doc = inner
                .collections
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|d| &d.task.id == id))
                .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
            patch.apply(&mut doc.task);
        }
        self.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &TaskId) -> StoreResult<()> {
        self.check_writable()?;
        if let Some(docs) = self.inner.borrow_mut().collections.get_mut(collection) {
            docs.retain(|d| &d.task.id != id);
        }
        self.notify(collection);
        Ok(())
    }
}

#[cfg(test)]
impl MemoryStore {
    /// Insert tasks directly, without notifying listeners
    pub fn seed(&self, collection: &str, tasks: Vec<Task>) {
        let mut inner = self.inner.borrow_mut();
        for task in tasks {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner
                .collections
                .entry(collection.to_string())
                .or_default()
                .push(StoredDoc { seq, task });
        }
    }

    pub fn fail_writes(&self, err: StoreError) {
        self.inner.borrow_mut().write_failure = Some(err);
    }

    pub fn recover(&self) {
        self.inner.borrow_mut().write_failure = None;
    }

    pub fn pause(&self) {
        self.inner.borrow_mut().paused = true;
    }

    /// Resume delivery and send every listener its current snapshot
    pub fn flush(&self) {
        let collections: Vec<String> = {
            let mut inner = self.inner.borrow_mut();
            inner.paused = false;
            let mut names: Vec<String> = inner.listeners.iter().map(|l| l.collection.clone()).collect();
            names.sort();
            names.dedup();
            names
        };
        for collection in collections {
            self.notify(&collection);
        }
    }

    /// Fail every listener on `collection`; failed listeners are detached
    pub fn emit_error(&self, collection: &str, err: StoreError) {
        let failed: Vec<Rc<dyn Fn(StoreError)>> = {
            let mut inner = self.inner.borrow_mut();
            let failed = inner
                .listeners
                .iter()
                .filter(|l| l.collection == collection)
                .map(|l| l.on_error.clone())
                .collect();
            inner.listeners.retain(|l| l.collection != collection);
            failed
        };
        for on_error in failed {
            on_error(err.clone());
        }
    }

    pub fn create_calls(&self) -> usize {
        self.inner.borrow().create_calls
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn tasks(&self, collection: &str) -> Vec<Task> {
        self.inner.borrow().snapshot(collection, true)
    }
}

// ========================
// Auth Provider
// ========================

struct Account {
    uid: String,
    password: String,
}

#[derive(Default)]
struct AuthInner {
    accounts: HashMap<String, Account>,
    current: Option<UserInfo>,
    listeners: Vec<(u64, Rc<dyn Fn(Option<UserInfo>)>)>,
    next_listener: u64,
    /// Returned by the next login/register/logout while set
    forced_failure: Option<AuthError>,
}

/// In-memory email/password auth provider
#[derive(Clone, Default)]
pub struct MemoryAuth {
    inner: Rc<RefCell<AuthInner>>,
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_forced_failure(&self) -> Result<(), AuthError> {
        match self.inner.borrow_mut().forced_failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn set_current(&self, user: Option<UserInfo>) {
        let listeners: Vec<Rc<dyn Fn(Option<UserInfo>)>> = {
            let mut inner = self.inner.borrow_mut();
            inner.current = user.clone();
            inner.listeners.iter().map(|(_, cb)| cb.clone()).collect()
        };
        for callback in listeners {
            callback(user.clone());
        }
    }
}

#[async_trait(?Send)]
impl AuthClient for MemoryAuth {
    async fn login(&self, credentials: &Credentials) -> Result<UserInfo, AuthError> {
        self.take_forced_failure()?;
        if !is_valid_email(&credentials.email) {
            return Err(AuthError::new(AuthErrorCode::InvalidEmail, "malformed email"));
        }
        let user = {
            let inner = self.inner.borrow();
            let account = inner
                .accounts
                .get(&credentials.email)
                .ok_or_else(|| AuthError::new(AuthErrorCode::UserNotFound, "no such account"))?;
            if account.password != credentials.password {
                return Err(AuthError::new(AuthErrorCode::WrongPassword, "password mismatch"));
            }
            UserInfo {
                uid: account.uid.clone(),
                email: Some(credentials.email.clone()),
            }
        };
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn register(&self, credentials: &Credentials) -> Result<UserInfo, AuthError> {
        self.take_forced_failure()?;
        if !is_valid_email(&credentials.email) {
            return Err(AuthError::new(AuthErrorCode::InvalidEmail, "malformed email"));
        }
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::new(AuthErrorCode::WeakPassword, "password too short"));
        }
        let user = {
            let mut inner = self.inner.borrow_mut();
            if inner.accounts.contains_key(&credentials.email) {
                return Err(AuthError::new(AuthErrorCode::EmailAlreadyInUse, "account exists"));
            }
            let uid = format!("local-{}", inner.accounts.len() + 1);
            inner.accounts.insert(
                credentials.email.clone(),
                Account {
                    uid: uid.clone(),
                    password: credentials.password.clone(),
                },
            );
            UserInfo {
                uid,
                email: Some(credentials.email.clone()),
            }
        };
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.take_forced_failure()?;
        self.set_current(None);
        Ok(())
    }

    fn on_auth_state_changed(&self, callback: AuthCallback) -> Subscription {
        let callback: Rc<dyn Fn(Option<UserInfo>)> = Rc::from(callback);
        let (id, current) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_listener;
            inner.next_listener += 1;
            inner.listeners.push((id, callback.clone()));
            (id, inner.current.clone())
        };
        callback(current);

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(l, _)| *l != id);
            }
        })
    }
}

#[cfg(test)]
impl MemoryAuth {
    /// Make the next auth call fail with `code`
    pub fn fail_next(&self, code: &str) {
        self.inner.borrow_mut().forced_failure = Some(AuthError::from_code(code, "forced"));
    }

    pub fn add_account(&self, email: &str, password: &str) {
        let mut inner = self.inner.borrow_mut();
        let uid = format!("local-{}", inner.accounts.len() + 1);
        inner.accounts.insert(
            email.to_string(),
            Account {
                uid,
                password: password.to_string(),
            },
        );
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const TASKS: &str = "tasks";

    fn recorder() -> (Rc<RefCell<Vec<Vec<Task>>>>, SnapshotCallback) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, Box::new(move |tasks| sink.borrow_mut().push(tasks)))
    }

    #[tokio::test]
    async fn test_subscribe_delivers_initial_snapshot() {
        let store = MemoryStore::new();
        store.seed(TASKS, vec![Task::new("a", "A")]);
        let (seen, on_snapshot) = recorder();
        let _sub = store.subscribe(TASKS, &OrderSpec::default(), on_snapshot, Box::new(|_| {}));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0][0].title, "A");
    }

    #[tokio::test]
    async fn test_create_orders_newest_first() {
        let store = MemoryStore::new();
        let (seen, on_snapshot) = recorder();
        let _sub = store.subscribe(TASKS, &OrderSpec::default(), on_snapshot, Box::new(|_| {}));

        store.create(TASKS, &NewTask::new("first", "").unwrap()).await.unwrap();
        store.create(TASKS, &NewTask::new("second", "notes").unwrap()).await.unwrap();

        let last = seen.borrow().last().cloned().unwrap();
        let titles: Vec<&str> = last.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
        assert!(last.iter().all(|t| !t.completed && t.created_at.is_some()));
        assert_eq!(last[0].description.as_deref(), Some("notes"));
    }

    #[tokio::test]
    async fn test_dropped_subscription_stops_delivery() {
        let store = MemoryStore::new();
        let (seen, on_snapshot) = recorder();
        let sub = store.subscribe(TASKS, &OrderSpec::default(), on_snapshot, Box::new(|_| {}));
        assert_eq!(store.listener_count(), 1);
        drop(sub);
        assert_eq!(store.listener_count(), 0);

        store.create(TASKS, &NewTask::new("x", "").unwrap()).await.unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_task_fails() {
        let store = MemoryStore::new();
        let err = store
            .update(TASKS, &TaskId::new("nope"), &TaskPatch { completed: Some(true) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state() {
        let store = MemoryStore::new();
        store.seed(TASKS, vec![Task::new("a", "A")]);
        store.fail_writes(StoreError::Unavailable("offline".into()));

        assert!(store.delete(TASKS, &TaskId::new("a")).await.is_err());
        assert!(store.create(TASKS, &NewTask::new("B", "").unwrap()).await.is_err());
        assert_eq!(store.tasks(TASKS).len(), 1);
        assert_eq!(store.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = MemoryAuth::new();
        let creds = Credentials::new("me@example.com", "secret1");
        let user = auth.register(&creds).await.unwrap();
        auth.logout().await.unwrap();
        let again = auth.login(&creds).await.unwrap();
        assert_eq!(user, again);
    }

    #[tokio::test]
    async fn test_auth_error_codes() {
        let auth = MemoryAuth::new();
        let code = |r: Result<UserInfo, AuthError>| r.unwrap_err().code;

        assert_eq!(
            code(auth.register(&Credentials::new("bad-email", "secret1")).await),
            AuthErrorCode::InvalidEmail
        );
        assert_eq!(
            code(auth.register(&Credentials::new("me@example.com", "123")).await),
            AuthErrorCode::WeakPassword
        );
        assert_eq!(
            code(auth.login(&Credentials::new("me@example.com", "secret1")).await),
            AuthErrorCode::UserNotFound
        );

        auth.add_account("me@example.com", "secret1");
        assert_eq!(
            code(auth.login(&Credentials::new("me@example.com", "wrong!")).await),
            AuthErrorCode::WrongPassword
        );
        assert_eq!(
            code(auth.register(&Credentials::new("me@example.com", "secret1")).await),
            AuthErrorCode::EmailAlreadyInUse
        );
    }

    #[tokio::test]
    async fn test_auth_listener_sees_transitions() {
        let auth = MemoryAuth::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = auth.on_auth_state_changed(Box::new(move |user| sink.borrow_mut().push(user.is_some())));

        auth.register(&Credentials::new("me@example.com", "secret1")).await.unwrap();
        auth.logout().await.unwrap();
        assert_eq!(*seen.borrow(), vec![false, true, false]);

        drop(sub);
        assert_eq!(auth.listener_count(), 0);
    }
}
