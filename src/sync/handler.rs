//! Listener that keeps a [`Document`] in sync with the event stream.
//!
//! [`DocumentSync`] is handed to the event source and runs on the connection
//! task; [`SyncHandle`] stays with the consumer and reads the published
//! document and notices from any task.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::warn;

use super::document::Document;
use super::reconciler::{Reconciler, UpdateKind};
use crate::error::{EventSourceError, EventSourceResult};
use crate::sse::MessageEvent;
use crate::traits::EventSourceHandler;

/// Notification sent to the consumer, in stream order.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncNotice {
    Connected,
    /// A snapshot replaced the document
    Replaced { document: Arc<Document> },
    /// A patch was applied
    Patched {
        document: Arc<Document>,
        operations: usize,
    },
    /// A connection attempt failed or an event was rejected
    Error(EventSourceError),
    Closed { will_reconnect: bool },
}

impl SyncNotice {
    /// The document published by this update, if it is one.
    pub fn document(&self) -> Option<&Arc<Document>> {
        match self {
            SyncNotice::Replaced { document } | SyncNotice::Patched { document, .. } => {
                Some(document)
            }
            _ => None,
        }
    }
}

/// Reconciling listener. See [`DocumentSync::new`].
#[derive(Debug)]
pub struct DocumentSync {
    reconciler: Reconciler,
    notices: mpsc::UnboundedSender<SyncNotice>,
}

impl DocumentSync {
    /// Create the listener and its consumer handle, starting from `initial`.
    pub fn new(initial: Value) -> (Self, SyncHandle) {
        let reconciler = Reconciler::new(initial);
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = SyncHandle {
            document: reconciler.store().subscribe(),
            notices: rx,
        };
        (
            Self {
                reconciler,
                notices: tx,
            },
            handle,
        )
    }

    pub fn document(&self) -> Arc<Document> {
        self.reconciler.document()
    }

    fn notify(&self, notice: SyncNotice) {
        if self.notices.send(notice).is_err() {
            warn!("sync handle dropped, notice discarded");
        }
    }
}

impl EventSourceHandler for DocumentSync {
    fn on_connect(&mut self) {
        self.notify(SyncNotice::Connected);
    }

    fn on_message(&mut self, message: &MessageEvent) -> EventSourceResult<()> {
        let (document, kind) = self.reconciler.apply(&message.event_type, &message.data)?;
        let notice = match kind {
            UpdateKind::Replaced => SyncNotice::Replaced { document },
            UpdateKind::Patched { operations } => SyncNotice::Patched {
                document,
                operations,
            },
        };
        self.notify(notice);
        Ok(())
    }

    fn on_error(&mut self, error: &EventSourceError) {
        self.notify(SyncNotice::Error(error.clone()));
    }

    fn on_closed(&mut self, will_reconnect: bool) {
        self.notify(SyncNotice::Closed { will_reconnect });
    }
}

/// Consumer side of a [`DocumentSync`].
#[derive(Debug)]
pub struct SyncHandle {
    document: watch::Receiver<Arc<Document>>,
    notices: mpsc::UnboundedReceiver<SyncNotice>,
}

impl SyncHandle {
    /// Latest published document.
    pub fn document(&self) -> Arc<Document> {
        self.document.borrow().clone()
    }

    /// Independent receiver of document updates.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Document>> {
        self.document.clone()
    }

    /// Next notice, or `None` once the listener is gone and all notices
    /// were read.
    pub async fn next_notice(&mut self) -> Option<SyncNotice> {
        self.notices.recv().await
    }

    /// Wait for the next document update.
    pub async fn changed(&mut self) -> Option<Arc<Document>> {
        self.document.changed().await.ok()?;
        Some(self.document.borrow_and_update().clone())
    }
}
