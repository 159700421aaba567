//! Document reconciliation on top of the event stream.
//!
//! - `document` - versioned JSON document and its atomic publication
//! - `reconciler` - applies `data` snapshots and `patch` operation lists
//! - `handler` - [`DocumentSync`] listener and the consumer's [`SyncHandle`]

mod document;
mod handler;
mod reconciler;

pub use document::{Document, DocumentStore};
pub use handler::{DocumentSync, SyncHandle, SyncNotice};
pub use reconciler::{Reconciler, UpdateKind, PATCH_EVENT, SNAPSHOT_EVENT};
