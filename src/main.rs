use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use eventsync::cli::{parse_args, run_cli_command, USAGE};

/// Log filter from EVENTSYNC_LOG, then RUST_LOG, then `info`.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env("EVENTSYNC_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    color_eyre::install()?;

    // stdout carries documents only
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    run_cli_command(command).await
}
