//! Browser Bridge Bindings
//!
//! Store and auth clients backed by the hosted backend SDK. The host page
//! exposes the SDK as `window.__TASKS_BACKEND__`; every call here is a thin
//! binding onto that object.

use std::rc::Rc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

use super::traits::{AuthCallback, AuthClient, DocumentStore, ErrorCallback, SnapshotCallback, Subscription};
use crate::config::BackendConfig;
use crate::domain::{
    AuthError, Credentials, NewTask, OrderSpec, StoreError, StoreResult, Task, TaskDocument,
    TaskId, TaskPatch, UserInfo,
};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TASKS_BACKEND__"], js_name = init, catch)]
    fn bridge_init(config: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TASKS_BACKEND__"], js_name = subscribe, catch)]
    fn bridge_subscribe(
        collection: &str,
        order_field: &str,
        descending: bool,
        on_snapshot: &Closure<dyn FnMut(JsValue)>,
        on_error: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<js_sys::Function, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TASKS_BACKEND__"], js_name = create, catch)]
    async fn bridge_create(collection: &str, fields: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TASKS_BACKEND__"], js_name = update, catch)]
    async fn bridge_update(collection: &str, id: &str, fields: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TASKS_BACKEND__"], js_name = remove, catch)]
    async fn bridge_delete(collection: &str, id: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TASKS_BACKEND__"], js_name = login, catch)]
    async fn bridge_login(email: &str, password: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TASKS_BACKEND__"], js_name = register, catch)]
    async fn bridge_register(email: &str, password: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TASKS_BACKEND__"], js_name = logout, catch)]
    async fn bridge_logout() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TASKS_BACKEND__"], js_name = onAuthStateChanged, catch)]
    fn bridge_on_auth_state_changed(callback: &Closure<dyn FnMut(JsValue)>) -> Result<js_sys::Function, JsValue>;
}

/// The bridge could not be set up
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("backend bridge is not loaded on this page")]
    Missing,
    #[error("backend bridge rejected the configuration: {0}")]
    Init(String),
    #[error("failed to encode configuration: {0}")]
    Encode(String),
}

/// Initialize the hosted SDK and return clients bound to it
pub fn connect(config: &BackendConfig) -> Result<(FirebaseStore, FirebaseAuth), BridgeError> {
    let window = web_sys::window().ok_or(BridgeError::Missing)?;
    let bridge = js_sys::Reflect::get(&window, &JsValue::from_str("__TASKS_BACKEND__"))
        .map_err(|_| BridgeError::Missing)?;
    if bridge.is_undefined() || bridge.is_null() {
        return Err(BridgeError::Missing);
    }

    let js_config = serde_wasm_bindgen::to_value(config).map_err(|e| BridgeError::Encode(e.to_string()))?;
    bridge_init(js_config).map_err(|e| BridgeError::Init(error_parts(&e).1))?;
    log::info!("backend bridge initialized for project {}", config.project_id);
    Ok((FirebaseStore, FirebaseAuth))
}

/// `(code, message)` of a rejected promise or thrown error
fn error_parts(err: &JsValue) -> (String, String) {
    let field = |name: &str| {
        js_sys::Reflect::get(err, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_string())
    };
    let code = field("code").unwrap_or_default();
    let message = field("message")
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    (code, message)
}

fn store_error(err: &JsValue) -> StoreError {
    let (code, message) = error_parts(err);
    StoreError::from_code(&code, message)
}

fn auth_error(err: &JsValue) -> AuthError {
    let (code, message) = error_parts(err);
    AuthError::from_code(&code, message)
}

fn parse_user(value: JsValue) -> Option<UserInfo> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    match serde_wasm_bindgen::from_value(value) {
        Ok(user) => Some(user),
        Err(e) => {
            log::error!("failed to decode auth user: {e}");
            None
        }
    }
}

// ========================
// Document Store
// ========================

/// Placeholder the bridge replaces with the server timestamp
#[derive(Serialize)]
struct ServerTimestamp {
    #[serde(rename = "__serverTimestamp")]
    marker: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateFields<'a> {
    title: &'a str,
    description: &'a str,
    completed: bool,
    created_at: ServerTimestamp,
}

impl<'a> From<&'a NewTask> for CreateFields<'a> {
    fn from(task: &'a NewTask) -> Self {
        Self {
            title: task.title(),
            description: task.description().unwrap_or_default(),
            completed: false,
            created_at: ServerTimestamp { marker: true },
        }
    }
}

/// Document store reached through the browser bridge
#[derive(Debug, Clone, Copy)]
pub struct FirebaseStore;

#[async_trait(?Send)]
impl DocumentStore for FirebaseStore {
    fn subscribe(
        &self,
        collection: &str,
        order: &OrderSpec,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription {
        let on_error: Rc<dyn Fn(StoreError)> = Rc::from(on_error);
        let decode_error = on_error.clone();
        let subscribe_error = on_error.clone();
        let snapshot_closure = Closure::<dyn FnMut(JsValue)>::new(move |docs: JsValue| {
            match serde_wasm_bindgen::from_value::<Vec<TaskDocument>>(docs) {
                Ok(docs) => on_snapshot(docs.into_iter().map(Task::from).collect()),
                Err(e) => decode_error(StoreError::Malformed(e.to_string())),
            }
        });
        let error_closure = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| on_error(store_error(&err)));

        let unsubscribe = match bridge_subscribe(
            collection,
            &order.field,
            order.is_descending(),
            &snapshot_closure,
            &error_closure,
        ) {
            Ok(unsubscribe) => unsubscribe,
            Err(err) => {
                subscribe_error(store_error(&err));
                return Subscription::detached((snapshot_closure, error_closure));
            }
        };
        Subscription::new(move || {
            if let Err(e) = unsubscribe.call0(&JsValue::NULL) {
                log::warn!("unsubscribe failed: {}", error_parts(&e).1);
            }
            drop(snapshot_closure);
            drop(error_closure);
        })
    }

    async fn create(&self, collection: &str, task: &NewTask) -> StoreResult<()> {
        let fields = serde_wasm_bindgen::to_value(&CreateFields::from(task))
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        bridge_create(collection, fields).await.map_err(|e| store_error(&e))?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &TaskId, patch: &TaskPatch) -> StoreResult<()> {
        let fields = serde_wasm_bindgen::to_value(patch).map_err(|e| StoreError::Malformed(e.to_string()))?;
        bridge_update(collection, id.as_str(), fields)
            .await
            .map_err(|e| store_error(&e))?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &TaskId) -> StoreResult<()> {
        bridge_delete(collection, id.as_str()).await.map_err(|e| store_error(&e))?;
        Ok(())
    }
}

// ========================
// Auth Provider
// ========================

/// Auth provider reached through the browser bridge
#[derive(Debug, Clone, Copy)]
pub struct FirebaseAuth;

#[async_trait(?Send)]
impl AuthClient for FirebaseAuth {
    async fn login(&self, credentials: &Credentials) -> Result<UserInfo, AuthError> {
        let user = bridge_login(&credentials.email, &credentials.password)
            .await
            .map_err(|e| auth_error(&e))?;
        parse_user(user).ok_or_else(|| AuthError::from_code("auth/internal-error", "missing user"))
    }

    async fn register(&self, credentials: &Credentials) -> Result<UserInfo, AuthError> {
        let user = bridge_register(&credentials.email, &credentials.password)
            .await
            .map_err(|e| auth_error(&e))?;
        parse_user(user).ok_or_else(|| AuthError::from_code("auth/internal-error", "missing user"))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        bridge_logout().await.map_err(|e| auth_error(&e))?;
        Ok(())
    }

    fn on_auth_state_changed(&self, callback: AuthCallback) -> Subscription {
        let callback: Rc<dyn Fn(Option<UserInfo>)> = Rc::from(callback);
        let report = callback.clone();
        let closure = Closure::<dyn FnMut(JsValue)>::new(move |user: JsValue| report(parse_user(user)));
        let unsubscribe = match bridge_on_auth_state_changed(&closure) {
            Ok(unsubscribe) => unsubscribe,
            // Nobody can be signed in without a listener
            Err(err) => {
                log::error!("auth listener failed: {}", auth_error(&err));
                callback(None);
                return Subscription::detached(closure);
            }
        };
        Subscription::new(move || {
            if let Err(e) = unsubscribe.call0(&JsValue::NULL) {
                log::warn!("auth unsubscribe failed: {}", error_parts(&e).1);
            }
            drop(closure);
        })
    }
}
