//! CLI module for eventsync.
//!
//! - Argument parsing
//! - Version and help display
//! - The `watch` command streaming a reconciled document to stdout
//!
//! # Usage
//!
//! ```ignore
//! use eventsync::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! run_cli_command(command).await?;
//! ```

pub mod args;
pub mod version;
pub mod watch;

pub use args::{parse_args, ArgsError, CliCommand, WatchArgs, USAGE};
pub use version::{handle_version_command, VERSION};
pub use watch::run_watch;

use color_eyre::Result;

/// Run a parsed CLI command to completion.
pub async fn run_cli_command(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => {
            handle_version_command();
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Watch(args) => run_watch(args).await,
    }
}
