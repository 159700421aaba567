//! Command-line argument parsing for the eventsync CLI.
//!
//! ```text
//! eventsync [--version|-V] [--help|-h] <URL> [--request-path P]
//!           [--header 'Name: value']... [--reconnect-ms N] [--last-event-id ID]
//! ```

use std::time::Duration;

use thiserror::Error;

use crate::config::EventSourceConfig;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Watch a stream and print the reconciled document
    Watch(WatchArgs),
}

/// Options for watching a stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WatchArgs {
    pub url: String,
    pub request_path: Option<String>,
    pub headers: Vec<(String, String)>,
    pub reconnect_ms: Option<u64>,
    pub last_event_id: Option<String>,
}

impl WatchArgs {
    pub fn to_config(&self) -> EventSourceConfig {
        let mut config =
            EventSourceConfig::new(self.url.clone()).with_headers(self.headers.iter().cloned());
        if let Some(path) = &self.request_path {
            config = config.with_request_path(path.clone());
        }
        if let Some(millis) = self.reconnect_ms {
            config = config.with_reconnect_delay(Duration::from_millis(millis));
        }
        if let Some(id) = &self.last_event_id {
            config = config.with_last_event_id(id.clone());
        }
        config
    }
}

/// Argument errors, reported with the usage text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("missing stream URL")]
    MissingUrl,

    #[error("unexpected argument '{0}'")]
    Unexpected(String),

    #[error("option '{0}' requires a value")]
    MissingValue(String),

    #[error("invalid header '{0}' (expected 'Name: value')")]
    InvalidHeader(String),

    #[error("invalid reconnect delay '{0}' (expected milliseconds)")]
    InvalidDelay(String),
}

pub const USAGE: &str = "\
Usage: eventsync [OPTIONS] <URL>

Watch a Server-Sent Events stream of JSON snapshots and patches and print
each document revision as one JSON line.

Options:
  --request-path <PATH>     Request target sent instead of the full URL
  --header <'Name: value'>  Extra request header (repeatable)
  --reconnect-ms <MILLIS>   Delay before reconnecting (default: 2000)
  --last-event-id <ID>      Resume the stream from this event id
  -V, --version             Print version
  -h, --help                Print help

Logging is controlled by EVENTSYNC_LOG (falls back to RUST_LOG).";

/// Parse command-line arguments (program name first).
///
/// # Examples
///
/// ```
/// use eventsync::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["eventsync".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut watch = WatchArgs::default();
    let mut url = None;
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--request-path" => watch.request_path = Some(value(&mut args, &arg)?),
            "--header" => {
                let raw = value(&mut args, &arg)?;
                watch.headers.push(parse_header(&raw)?);
            }
            "--reconnect-ms" => {
                let raw = value(&mut args, &arg)?;
                let millis = raw.parse().map_err(|_| ArgsError::InvalidDelay(raw))?;
                watch.reconnect_ms = Some(millis);
            }
            "--last-event-id" => watch.last_event_id = Some(value(&mut args, &arg)?),
            other if other.starts_with('-') => return Err(ArgsError::Unexpected(arg)),
            _ if url.is_none() => url = Some(arg),
            _ => return Err(ArgsError::Unexpected(arg)),
        }
    }

    watch.url = url.ok_or(ArgsError::MissingUrl)?;
    Ok(CliCommand::Watch(watch))
}

fn value<I>(args: &mut I, option: &str) -> Result<String, ArgsError>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| ArgsError::MissingValue(option.to_string()))
}

fn parse_header(raw: &str) -> Result<(String, String), ArgsError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| ArgsError::InvalidHeader(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ArgsError::InvalidHeader(raw.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
