//! Unique Passwords command-line shell.
//!
//! Wires the derivation engine, the account cache and the username
//! heuristic behind a small `clap` interface. All logic lives in the
//! library crates; this crate parses arguments, reads the master password
//! and prints results.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod commands;
pub mod fill;
pub mod logging;

use clap::Parser;

use commands::Cli;

/// Parse arguments, install logging and run the command.
///
/// # Errors
///
/// Returns the command's failure for `main` to report.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init();
    tracing::debug!(command = ?cli.command, "starting");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    commands::execute(cli, &mut stdin.lock(), &mut stdout.lock())
}
