//! Reconnect-in-progress guard.
//!
//! Only one reconnect may be outstanding at a time. The flag is shared between
//! the connection task and the public handle, so it is an atomic with
//! compare-and-set acquisition; release happens when the returned
//! [`PendingReconnect`] is dropped, on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ReconnectGuard {
    pending: Arc<AtomicBool>,
}

impl ReconnectGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the single reconnect slot. Returns `None` if a reconnect is
    /// already scheduled.
    pub fn try_schedule(&self) -> Option<PendingReconnect> {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PendingReconnect {
                pending: self.pending.clone(),
            })
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// Holds the reconnect slot until dropped.
#[derive(Debug)]
pub struct PendingReconnect {
    pending: Arc<AtomicBool>,
}

impl Drop for PendingReconnect {
    fn drop(&mut self) {
        self.pending.store(false, Ordering::Release);
    }
}
