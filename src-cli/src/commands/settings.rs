//! `settings`: show or change the global defaults.

use std::io::Write;
use std::path::Path;

use anyhow::bail;
use clap::{Args, Subcommand};
use unique_passwords_accounts::Settings;
use unique_passwords_core::HashAlgorithm;

use super::save_settings;

/// `settings` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum SettingsCommand {
    /// Print settings as JSON.
    Show,
    /// Change one or more settings.
    Set(SetArgs),
}

/// Fields `settings set` may change.
#[derive(Debug, Clone, Default, Args)]
pub struct SetArgs {
    /// `sha-1`, `sha-256`, `sha-384`, `sha-512` or `scrypt`.
    #[arg(long)]
    pub algorithm: Option<HashAlgorithm>,
    /// scrypt work factor, a power of two.
    #[arg(long)]
    pub cost_factor: Option<u32>,
    /// Default password length.
    #[arg(long)]
    pub length: Option<usize>,
    /// Remember parameters per account.
    #[arg(long)]
    pub cache_accounts: Option<bool>,
    /// Characters of the lowercase class.
    #[arg(long)]
    pub lowercase_chars: Option<String>,
    /// Characters of the uppercase class.
    #[arg(long)]
    pub uppercase_chars: Option<String>,
    /// Characters of the digit class.
    #[arg(long)]
    pub number_chars: Option<String>,
    /// Characters of the special class.
    #[arg(long)]
    pub special_chars: Option<String>,
}

/// Validate and apply `args`. Nothing changes if any value is rejected.
///
/// # Errors
///
/// Returns an error for a zero length, an empty character table, or a cost
/// factor that is not a power of two of at least 2.
pub fn apply(settings: &mut Settings, args: &SetArgs) -> anyhow::Result<()> {
    if let Some(cost) = args.cost_factor {
        if cost < 2 || !cost.is_power_of_two() {
            bail!("cost factor must be a power of two of at least 2, got {cost}");
        }
    }
    if args.length == Some(0) {
        bail!("password length must be at least 1");
    }
    let tables = [
        ("lowercase", &args.lowercase_chars),
        ("uppercase", &args.uppercase_chars),
        ("number", &args.number_chars),
        ("special", &args.special_chars),
    ];
    for (name, table) in tables {
        if table.as_deref().is_some_and(str::is_empty) {
            bail!("{name} character table must not be empty");
        }
    }

    if let Some(algorithm) = args.algorithm {
        settings.global_hash_algorithm = algorithm.as_str().to_string();
    }
    if let Some(cost) = args.cost_factor {
        settings.global_cost_factor = cost;
    }
    if let Some(length) = args.length {
        settings.global_password_length = length;
    }
    if let Some(cache) = args.cache_accounts {
        settings.global_cache_accounts = cache;
    }
    if let Some(chars) = &args.lowercase_chars {
        settings.lowercase_chars.clone_from(chars);
    }
    if let Some(chars) = &args.uppercase_chars {
        settings.uppercase_chars.clone_from(chars);
    }
    if let Some(chars) = &args.number_chars {
        settings.number_chars.clone_from(chars);
    }
    if let Some(chars) = &args.special_chars {
        settings.special_chars.clone_from(chars);
    }
    Ok(())
}

/// Run a `settings` subcommand.
///
/// # Errors
///
/// Returns validation or I/O failures.
pub fn execute(
    data_dir: &Path,
    command: &SettingsCommand,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    let mut settings = Settings::load(data_dir);
    match command {
        SettingsCommand::Show => {
            serde_json::to_writer_pretty(&mut *output, &settings)?;
            writeln!(output)?;
        }
        SettingsCommand::Set(args) => {
            apply(&mut settings, args)?;
            save_settings(&settings, data_dir)?;
            tracing::info!("settings updated");
        }
    }
    Ok(())
}
