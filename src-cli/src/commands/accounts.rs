//! `accounts`: inspect, edit and prune the account cache.

use std::io::Write;
use std::path::Path;

use anyhow::bail;
use clap::Subcommand;
use unique_passwords_accounts::{AccountsError, CachedAccountRecord, Settings};

use super::{save_settings, ParameterOverrides};

/// `accounts` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum AccountsCommand {
    /// List cached accounts as JSON.
    List {
        /// Only accounts for this domain.
        #[arg(long)]
        domain: Option<String>,
    },
    /// Change the length or classes remembered for one account.
    Set {
        /// Normalized domain.
        #[arg(long)]
        domain: String,
        /// Username on that domain.
        #[arg(long)]
        username: String,
        #[command(flatten)]
        overrides: ParameterOverrides,
    },
    /// Forget one cached account.
    Delete {
        /// Normalized domain.
        #[arg(long)]
        domain: String,
        /// Username on that domain.
        #[arg(long)]
        username: String,
    },
}

/// Cached records, optionally restricted to one domain.
#[must_use]
pub fn list<'a>(settings: &'a Settings, domain: Option<&'a str>) -> Vec<&'a CachedAccountRecord> {
    match domain {
        Some(domain) => settings.cached_accounts.for_domain(domain).collect(),
        None => settings.cached_accounts.records().iter().collect(),
    }
}

/// Apply `overrides` to the cached record for (domain, username).
///
/// # Errors
///
/// Returns an error if the account is not cached, or if the result would
/// have a zero length or no character class.
pub fn edit(
    settings: &mut Settings,
    domain: &str,
    username: &str,
    overrides: &ParameterOverrides,
) -> anyhow::Result<()> {
    let current = settings
        .cached_accounts
        .find(domain, username)
        .map(CachedAccountRecord::parameters)
        .ok_or_else(|| AccountsError::AccountNotFound {
            domain: domain.to_string(),
            username: username.to_string(),
        })?;
    let updated = overrides.apply(current);
    if updated.length == 0 {
        bail!("password length must be at least 1");
    }
    if updated.classes.is_empty() {
        bail!("at least one character class must stay enabled");
    }
    settings.cached_accounts.update(domain, username, updated)?;
    Ok(())
}

/// Run an `accounts` subcommand.
///
/// # Errors
///
/// Returns [`AccountsError::AccountNotFound`] on editing or deleting an
/// unknown account, or an I/O failure.
pub fn execute(
    data_dir: &Path,
    command: &AccountsCommand,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    let mut settings = Settings::load(data_dir);
    match command {
        AccountsCommand::List { domain } => {
            let records = list(&settings, domain.as_deref());
            serde_json::to_writer_pretty(&mut *output, &records)?;
            writeln!(output)?;
        }
        AccountsCommand::Set {
            domain,
            username,
            overrides,
        } => {
            edit(&mut settings, domain, username, overrides)?;
            save_settings(&settings, data_dir)?;
            writeln!(output, "updated {username} on {domain}")?;
        }
        AccountsCommand::Delete { domain, username } => {
            let removed = settings.cached_accounts.remove(domain, username)?;
            save_settings(&settings, data_dir)?;
            writeln!(output, "removed {removed} account(s)")?;
        }
    }
    Ok(())
}
