//! Connection management.
//!
//! - `event_source` - public handle: construction, state queries, close
//! - `manager` - background task driving attempts and reconnects
//! - `connection` - per-attempt state and request construction
//! - `dispatcher` - forwards callbacks to the single listener
//! - `reconnect` - guard allowing one outstanding reconnect
//! - `state` - readiness and detailed connection state

mod connection;
mod dispatcher;
mod event_source;
mod manager;
mod reconnect;
mod state;

pub use connection::{build_request, Connection};
pub use dispatcher::Dispatcher;
pub use event_source::EventSource;
pub use reconnect::{PendingReconnect, ReconnectGuard};
pub use state::{ConnectionState, ReadyState};
