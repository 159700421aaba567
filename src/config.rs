//! Client configuration.
//!
//! [`EventSourceConfig`] collects everything needed to open (and reopen) the
//! stream. It is validated once into a [`StreamTarget`] before the background
//! task starts, so bad URLs fail at construction instead of looping.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use eventsync::config::EventSourceConfig;
//!
//! let config = EventSourceConfig::new("http://stockmarket.example.com")
//!     .with_request_path("prices")
//!     .with_header("X-Sd-Token", "secret")
//!     .with_reconnect_delay(Duration::from_millis(500));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::error::NetworkError;
use crate::traits::TlsEngineFactory;

/// Delay before a reconnect attempt unless the server sends `retry:`.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Headers always written by the client itself; caller values are ignored.
pub const RESERVED_HEADERS: &[&str] = &[
    "Accept",
    "Host",
    "Origin",
    "Cache-Control",
    "Last-Event-ID",
];

/// Returns true if `name` collides with a protocol-managed header.
pub fn is_reserved_header(name: &str) -> bool {
    RESERVED_HEADERS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Configuration for an [`EventSource`](crate::client::EventSource).
#[derive(Clone)]
pub struct EventSourceConfig {
    /// Target URL (`http` or `https`)
    pub url: String,
    /// Request target override, sent as `/` + path instead of the full URL
    pub request_path: Option<String>,
    /// Caller headers in insertion order; keys are unique (case-sensitive)
    pub headers: Vec<(String, String)>,
    /// Delay before each reconnect attempt (default: 2000ms)
    pub reconnect_delay: Duration,
    /// Id to resume from on the first attempt
    pub last_event_id: Option<String>,
    /// Optional bound on establishing the transport
    pub connect_timeout: Option<Duration>,
    /// TLS engine for `https` targets; the platform default is used when unset
    pub tls: Option<Arc<dyn TlsEngineFactory>>,
}

impl fmt::Debug for EventSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSourceConfig")
            .field("url", &self.url)
            .field("request_path", &self.request_path)
            .field("headers", &self.headers.len())
            .field("reconnect_delay", &self.reconnect_delay)
            .field("last_event_id", &self.last_event_id)
            .field("connect_timeout", &self.connect_timeout)
            .field("tls", &self.tls)
            .finish()
    }
}

impl EventSourceConfig {
    /// Create a config for `url` with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_path: None,
            headers: Vec::new(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            last_event_id: None,
            connect_timeout: None,
            tls: None,
        }
    }

    /// Set the request target override.
    pub fn with_request_path(mut self, path: impl Into<String>) -> Self {
        self.request_path = Some(path.into());
        self
    }

    /// Add a caller header. A later value for the same name replaces the
    /// earlier one in place; reserved protocol headers are ignored.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();

        if is_reserved_header(&name) {
            debug!(header = %name, "ignoring caller value for reserved header");
            return self;
        }
        if has_line_break(&name) || has_line_break(&value) {
            warn!(header = %name, "ignoring header containing a line break");
            return self;
        }

        match self.headers.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    /// Add several caller headers in order.
    pub fn with_headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        headers
            .into_iter()
            .fold(self, |config, (name, value)| config.with_header(name, value))
    }

    /// Set the reconnect delay.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the id to resume from on the first attempt.
    pub fn with_last_event_id(mut self, id: impl Into<String>) -> Self {
        self.last_event_id = Some(id.into());
        self
    }

    /// Bound the time spent establishing each transport.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Use a custom TLS engine for `https` targets.
    pub fn with_tls(mut self, factory: Arc<dyn TlsEngineFactory>) -> Self {
        self.tls = Some(factory);
        self
    }

    /// Look up a caller header by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Parse and check the target URL and the request path override.
    pub fn validate(&self) -> Result<StreamTarget, NetworkError> {
        if let Some(path) = &self.request_path {
            if path.contains(['\r', '\n', ' ']) {
                return Err(NetworkError::InvalidRequestPath { path: path.clone() });
            }
        }
        StreamTarget::parse(&self.url)
    }

    /// HTTP request target: `/` + request path when set, the normalized
    /// target URL otherwise.
    pub fn request_target(&self, target: &StreamTarget) -> String {
        match &self.request_path {
            Some(path) => format!("/{}", path.trim_start_matches('/')),
            None => target.url.as_str().to_string(),
        }
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\r', '\n'])
}

/// A validated stream endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTarget {
    pub url: Url,
    pub host: String,
    pub port: u16,
    pub secure: bool,
}

impl StreamTarget {
    /// Parse `raw` into a target. Only `http` and `https` with a host are
    /// accepted.
    pub fn parse(raw: &str) -> Result<Self, NetworkError> {
        let url = Url::parse(raw).map_err(|e| NetworkError::InvalidUrl {
            url: raw.to_string(),
            message: e.to_string(),
        })?;

        let secure = match url.scheme() {
            "http" => false,
            "https" => true,
            other => {
                return Err(NetworkError::UnsupportedScheme {
                    scheme: other.to_string(),
                })
            }
        };

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| NetworkError::InvalidUrl {
                url: raw.to_string(),
                message: "missing host".to_string(),
            })?
            .to_string();
        let port = url
            .port_or_known_default()
            .unwrap_or(if secure { 443 } else { 80 });

        Ok(Self {
            url,
            host,
            port,
            secure,
        })
    }

    /// Value of the `Host` header: the host, plus the port when it is not the
    /// scheme default.
    pub fn host_header(&self) -> String {
        match self.url.port() {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// `scheme://host`, used for the `Origin` header and event origins.
    pub fn origin(&self) -> String {
        format!("{}://{}", self.url.scheme(), self.host)
    }

    /// `host:port` for dialing.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for StreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
