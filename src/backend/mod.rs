//! Backend Layer
//!
//! Collaborator interfaces for the document store and the auth provider,
//! with a browser bridge implementation and an in-memory one.

mod firebase;
mod memory;
mod traits;

pub use firebase::{connect, BridgeError, FirebaseAuth, FirebaseStore};
pub use memory::{MemoryAuth, MemoryStore};
pub use traits::{AuthCallback, AuthClient, DocumentStore, ErrorCallback, SnapshotCallback, Subscription};
