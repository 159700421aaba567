//! TCP transport adapter.
//!
//! Dials the target over plain TCP and, for `https` targets, wraps the
//! socket in a TLS session negotiated with `tokio-native-tls`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio_native_tls::{native_tls, TlsConnector};
use tracing::{debug, trace};

use crate::config::{EventSourceConfig, StreamTarget};
use crate::error::NetworkError;
use crate::traits::{BoxedIo, Connector, TlsEngineFactory};

/// TLS engine backed by the platform's native TLS library.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeTlsFactory;

impl TlsEngineFactory for NativeTlsFactory {
    fn tls_connector(&self, target: &StreamTarget) -> Result<TlsConnector, NetworkError> {
        native_tls::TlsConnector::new()
            .map(TlsConnector::from)
            .map_err(|e| NetworkError::Tls {
                url: target.to_string(),
                message: e.to_string(),
            })
    }
}

/// Production [`Connector`] over `tokio::net::TcpStream`.
///
/// # Example
///
/// ```ignore
/// use eventsync::adapters::TcpConnector;
/// use std::time::Duration;
///
/// let connector = TcpConnector::new().with_connect_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    connect_timeout: Option<Duration>,
    tls: Option<Arc<dyn TlsEngineFactory>>,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a connector honouring the timeout and TLS settings of `config`.
    pub fn from_config(config: &EventSourceConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout,
            tls: config.tls.clone(),
        }
    }

    /// Bound the time spent on TCP connect plus TLS handshake.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Use a custom TLS engine for `https` targets.
    pub fn with_tls(mut self, factory: Arc<dyn TlsEngineFactory>) -> Self {
        self.tls = Some(factory);
        self
    }

    async fn dial(&self, target: &StreamTarget) -> Result<BoxedIo, NetworkError> {
        trace!(authority = %target.authority(), "dialing");
        let stream = TcpStream::connect(target.authority())
            .await
            .map_err(|e| NetworkError::ConnectionFailed {
                url: target.to_string(),
                message: e.to_string(),
            })?;
        // Events are small; don't batch the request write
        stream.set_nodelay(true)?;

        if !target.secure {
            return Ok(Box::new(stream));
        }

        let connector = match &self.tls {
            Some(factory) => factory.tls_connector(target)?,
            None => NativeTlsFactory.tls_connector(target)?,
        };
        let tls = connector
            .connect(&target.host, stream)
            .await
            .map_err(|e| NetworkError::Tls {
                url: target.to_string(),
                message: e.to_string(),
            })?;
        debug!(host = %target.host, "TLS session established");
        Ok(Box::new(tls))
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, target: &StreamTarget) -> Result<BoxedIo, NetworkError> {
        match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, self.dial(target))
                .await
                .map_err(|_| NetworkError::ConnectTimeout {
                    url: target.to_string(),
                    millis: limit.as_millis() as u64,
                })?,
            None => self.dial(target).await,
        }
    }
}
