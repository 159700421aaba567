//! Snapshot/patch reconciliation.
//!
//! `data` events replace the document with their JSON payload. `patch` events
//! carry an RFC 6902 operation list that is applied to a working copy; the
//! copy is published only if every operation succeeds. Any other event type is
//! rejected.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::document::{Document, DocumentStore};
use crate::error::SyncError;

pub const SNAPSHOT_EVENT: &str = "data";
pub const PATCH_EVENT: &str = "patch";

/// What an accepted event did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Replaced,
    Patched { operations: usize },
}

#[derive(Debug)]
pub struct Reconciler {
    store: DocumentStore,
}

impl Reconciler {
    pub fn new(initial: Value) -> Self {
        Self {
            store: DocumentStore::new(initial),
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn document(&self) -> Arc<Document> {
        self.store.current()
    }

    /// Apply one event. On error the document is left untouched.
    pub fn apply(
        &mut self,
        event_type: &str,
        payload: &str,
    ) -> Result<(Arc<Document>, UpdateKind), SyncError> {
        match event_type {
            SNAPSHOT_EVENT => {
                let value: Value = parse(event_type, payload)?;
                let document = self.store.publish(value);
                debug!(revision = document.revision, "document replaced");
                Ok((document, UpdateKind::Replaced))
            }
            PATCH_EVENT => {
                let patch: json_patch::Patch = parse(event_type, payload)?;
                let mut working = self.store.current().value.clone();
                json_patch::patch(&mut working, &patch.0).map_err(|e| SyncError::PatchFailed {
                    message: e.to_string(),
                })?;

                let operations = patch.0.len();
                let document = self.store.publish(working);
                debug!(revision = document.revision, operations, "document patched");
                Ok((document, UpdateKind::Patched { operations }))
            }
            other => Err(SyncError::UnexpectedEvent {
                event_type: other.to_string(),
            }),
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(event_type: &str, payload: &str) -> Result<T, SyncError> {
    serde_json::from_str(payload).map_err(|e| SyncError::InvalidJson {
        event_type: event_type.to_string(),
        message: e.to_string(),
    })
}
