//! The reconciled JSON document and its publication point.
//!
//! Readers never see a document being modified: every update builds a new
//! [`Document`] and swaps it in through a `watch` channel as one `Arc`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

/// One published version of the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub value: Value,
    /// 0 for the initial value, +1 per successful update
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            revision: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Single writer side of the document.
#[derive(Debug)]
pub struct DocumentStore {
    tx: watch::Sender<Arc<Document>>,
}

impl DocumentStore {
    pub fn new(initial: Value) -> Self {
        let (tx, _) = watch::channel(Arc::new(Document::new(initial)));
        Self { tx }
    }

    /// Latest published version.
    pub fn current(&self) -> Arc<Document> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Document>> {
        self.tx.subscribe()
    }

    /// Publish `value` as the next revision.
    pub fn publish(&self, value: Value) -> Arc<Document> {
        let document = Arc::new(Document {
            value,
            revision: self.current().revision + 1,
            updated_at: Utc::now(),
        });
        self.tx.send_replace(document.clone());
        document
    }
}
