//! Watch command: stream a document and print every revision.
//!
//! Each accepted snapshot or patch prints the whole document as one compact
//! JSON line on stdout. Errors and lifecycle changes go to the log (stderr).
//! Ctrl-C closes the client and waits for it to release the connection.

use std::io::Write;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde_json::json;
use tracing::{error, info, warn};

use super::args::WatchArgs;
use crate::client::EventSource;
use crate::sync::{Document, DocumentSync, SyncNotice};

/// Run until Ctrl-C.
pub async fn run_watch(args: WatchArgs) -> Result<()> {
    let config = args.to_config();
    let (listener, mut handle) = DocumentSync::new(json!([]));
    let source = EventSource::connect(config, listener)
        .wrap_err_with(|| format!("Cannot watch {}", args.url))?;
    info!(url = source.url(), "watching");

    loop {
        tokio::select! {
            notice = handle.next_notice() => match notice {
                Some(notice) => on_notice(notice)?,
                None => break,
            },
            signal = tokio::signal::ctrl_c() => {
                signal.wrap_err("Failed to listen for Ctrl-C")?;
                info!("interrupted, closing");
                break;
            }
        }
    }

    source.shutdown().await;
    // The listener is gone once shutdown returns, so this drains and ends
    while let Some(notice) = handle.next_notice().await {
        on_notice(notice)?;
    }
    Ok(())
}

fn on_notice(notice: SyncNotice) -> Result<()> {
    match notice {
        SyncNotice::Connected => info!("connected"),
        SyncNotice::Replaced { document } | SyncNotice::Patched { document, .. } => {
            print_document(&document)?
        }
        SyncNotice::Error(err) if err.category().is_event_scoped() => {
            error!(code = err.error_code(), "event rejected: {}", err)
        }
        SyncNotice::Error(err) => warn!(code = err.error_code(), "{}", err),
        SyncNotice::Closed { will_reconnect } => info!(will_reconnect, "disconnected"),
    }
    Ok(())
}

fn print_document(document: &Document) -> Result<()> {
    let line = serde_json::to_string(&document.value)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}
