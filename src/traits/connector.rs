//! Transport trait abstraction.
//!
//! A [`Connector`] opens the byte stream a connection attempt runs over.
//! The production implementation dials TCP (optionally wrapped in TLS); tests
//! plug in an in-memory server instead.

use std::fmt::Debug;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_native_tls::TlsConnector;

use crate::config::StreamTarget;
use crate::error::NetworkError;

/// Byte stream carrying one HTTP request and its event-stream response.
pub trait EventStreamIo: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> EventStreamIo for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// Owned, type-erased transport for one attempt.
pub type BoxedIo = Box<dyn EventStreamIo>;

/// Opens transports for connection attempts.
///
/// # Example
///
/// ```ignore
/// use eventsync::traits::Connector;
///
/// async fn open<C: Connector>(connector: &C, target: &StreamTarget) {
///     let io = connector.connect(target).await?;
///     // write the request, read the response...
/// }
/// ```
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a fresh transport to `target`.
    ///
    /// Called once per attempt; the previous transport has been dropped by
    /// then.
    async fn connect(&self, target: &StreamTarget) -> Result<BoxedIo, NetworkError>;
}

/// Builds the TLS engine used for `https` targets.
///
/// Invoked once per secure attempt so certificates or settings may change
/// between reconnects.
pub trait TlsEngineFactory: Send + Sync + Debug {
    fn tls_connector(&self, target: &StreamTarget) -> Result<TlsConnector, NetworkError>;
}
