//! `domain`: show how a URL maps to an account domain.

use std::io::Write;

use clap::Args;
use unique_passwords_core::normalize_domain;

/// Arguments for `domain`.
#[derive(Debug, Clone, Args)]
pub struct DomainArgs {
    /// Page URL or bare host.
    pub url: String,
    /// Keep subdomains instead of the last two labels.
    #[arg(long)]
    pub keep_subdomain: bool,
}

/// Print the normalized domain.
///
/// # Errors
///
/// Returns an error if `output` cannot be written.
pub fn execute(args: &DomainArgs, output: &mut impl Write) -> anyhow::Result<()> {
    writeln!(output, "{}", normalize_domain(&args.url, args.keep_subdomain))?;
    Ok(())
}
