//! Domain Layer
//!
//! Task and session types plus the error taxonomy shared by the
//! backend bindings and the view models.

mod error;
mod session;
mod task;

pub use error::{
    AuthError, AuthErrorCode, StoreError, StoreOperation, StoreResult, ValidationError,
};
pub use session::{AuthState, Credentials, UserInfo};
pub use task::{NewTask, OrderDirection, OrderSpec, Task, TaskDocument, TaskId, TaskPatch, TaskStats};
