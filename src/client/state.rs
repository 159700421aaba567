//! Connection state types.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Coarse readiness, as exposed by an event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    Connecting,
    Open,
    Closed,
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadyState::Connecting => write!(f, "connecting"),
            ReadyState::Open => write!(f, "open"),
            ReadyState::Closed => write!(f, "closed"),
        }
    }
}

/// Detailed connection state published by the background task.
///
/// `attempt` counts connection attempts from 1 and never resets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Task spawned, nothing dialed yet
    Idle,
    /// Transport being opened or response head being read
    Connecting { attempt: u32 },
    /// Response head accepted, events flowing
    Open { attempt: u32 },
    /// Waiting `delay` before attempt number `attempt`
    Reconnecting { attempt: u32, delay: Duration },
    /// Terminal; no further attempts
    Closed,
}

impl ConnectionState {
    pub fn ready_state(&self) -> ReadyState {
        match self {
            ConnectionState::Idle
            | ConnectionState::Connecting { .. }
            | ConnectionState::Reconnecting { .. } => ReadyState::Connecting,
            ConnectionState::Open { .. } => ReadyState::Open,
            ConnectionState::Closed => ReadyState::Closed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::Closed)
    }
}
