//! Command-line surface.
//!
//! Each subcommand lives in its own module with a pure core (settings and
//! documents in, values out) and a thin I/O wrapper called from
//! [`execute`].

pub mod accounts;
pub mod domain;
pub mod fill;
pub mod generate;
pub mod settings;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use unique_passwords_accounts::{GenerationParameters, Settings};
use zeroize::Zeroizing;

/// Directory name under the platform config dir.
const APP_DIR: &str = "unique-passwords";

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Derive per-site passwords from one master password.
#[derive(Debug, Parser)]
#[command(name = "unique-passwords", version, about)]
pub struct Cli {
    /// Directory holding settings.json (defaults to the platform config dir).
    #[arg(long, global = true, env = "UNIQUE_PASSWORDS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the account domain for a URL.
    Domain(domain::DomainArgs),
    /// Derive a password; the master password is read from stdin.
    Generate(generate::GenerateArgs),
    /// Fill a login form described as a JSON element tree.
    Fill(fill::FillArgs),
    /// Inspect, edit or delete cached accounts.
    #[command(subcommand)]
    Accounts(accounts::AccountsCommand),
    /// Show or change settings.
    #[command(subcommand)]
    Settings(settings::SettingsCommand),
}

/// Per-generation overrides on top of cached or global parameters.
#[derive(Debug, Clone, Default, Args)]
pub struct ParameterOverrides {
    /// Password length.
    #[arg(long)]
    pub length: Option<usize>,
    /// Use the lowercase table.
    #[arg(long)]
    pub lowercase: Option<bool>,
    /// Use the uppercase table.
    #[arg(long)]
    pub uppercase: Option<bool>,
    /// Use the digit table.
    #[arg(long)]
    pub digits: Option<bool>,
    /// Use the special table.
    #[arg(long)]
    pub special: Option<bool>,
}

impl ParameterOverrides {
    /// Apply every override that was given.
    #[must_use]
    pub fn apply(&self, mut parameters: GenerationParameters) -> GenerationParameters {
        if let Some(length) = self.length {
            parameters.length = length;
        }
        let classes = &mut parameters.classes;
        classes.lowercase = self.lowercase.unwrap_or(classes.lowercase);
        classes.uppercase = self.uppercase.unwrap_or(classes.uppercase);
        classes.digits = self.digits.unwrap_or(classes.digits);
        classes.special = self.special.unwrap_or(classes.special);
        parameters
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run one parsed command. `input` supplies the master password when one
/// is needed; results go to `output`.
///
/// # Errors
///
/// Returns any validation, derivation, document or I/O failure.
pub fn execute(cli: Cli, input: &mut impl BufRead, output: &mut impl Write) -> anyhow::Result<()> {
    let Cli { data_dir, command } = cli;
    dispatch(
        command,
        || resolve_data_dir(data_dir, dirs::config_dir()),
        input,
        output,
    )
}

/// `data_dir` is only called by commands that touch settings.
fn dispatch(
    command: Command,
    data_dir: impl FnOnce() -> anyhow::Result<PathBuf>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Domain(args) => domain::execute(&args, output),
        Command::Generate(args) => generate::execute(&data_dir()?, &args, input, output),
        Command::Fill(args) => fill::execute(&data_dir()?, &args, input, output),
        Command::Accounts(command) => accounts::execute(&data_dir()?, &command, output),
        Command::Settings(command) => settings::execute(&data_dir()?, &command, output),
    }
}

fn resolve_data_dir(
    explicit: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    match config_dir {
        Some(dir) => Ok(dir.join(APP_DIR)),
        None => bail!("no config directory on this platform; pass --data-dir"),
    }
}

/// Persist settings, creating the data directory when needed.
pub(crate) fn save_settings(settings: &Settings, data_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("cannot create {}", data_dir.display()))?;
    settings
        .save(data_dir)
        .with_context(|| format!("cannot save settings in {}", data_dir.display()))
}

/// Read the master password from the first line of `input`.
pub(crate) fn read_secret(input: &mut impl BufRead) -> anyhow::Result<SecretString> {
    let mut line = Zeroizing::new(String::new());
    input
        .read_line(&mut line)
        .context("cannot read master password from stdin")?;
    let secret = line.trim_end_matches(['\r', '\n']);
    if secret.is_empty() {
        tracing::warn!("master password is empty");
    }
    Ok(SecretString::from(secret.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use unique_passwords_core::CharacterClasses;

    #[test]
    fn overrides_apply_only_given_fields() {
        let base = GenerationParameters {
            length: 16,
            classes: CharacterClasses::ALL,
        };
        let overrides = ParameterOverrides {
            length: Some(10),
            special: Some(false),
            ..ParameterOverrides::default()
        };
        let applied = overrides.apply(base);
        assert_eq!(applied.length, 10);
        assert!(applied.classes.lowercase);
        assert!(!applied.classes.special);
    }

    #[test]
    fn read_secret_strips_line_ending() {
        let mut input = "s3cr3t\r\nnext line\n".as_bytes();
        let secret = read_secret(&mut input).unwrap();
        assert_eq!(secret.expose_secret(), "s3cr3t");
    }

    #[test]
    fn read_secret_keeps_inner_whitespace() {
        let mut input = " pass phrase \n".as_bytes();
        let secret = read_secret(&mut input).unwrap();
        assert_eq!(secret.expose_secret(), " pass phrase ");
    }

    #[test]
    fn cli_parses_global_data_dir_after_subcommand() {
        let cli = Cli::try_parse_from([
            "unique-passwords",
            "domain",
            "https://www.github.com/login",
            "--data-dir",
            "/tmp/up",
        ])
        .unwrap();
        assert_eq!(cli.data_dir.as_deref(), Some(Path::new("/tmp/up")));
        assert!(matches!(cli.command, Command::Domain(_)));
    }

    #[test]
    fn domain_runs_without_data_dir() {
        let cli = Cli::try_parse_from(["unique-passwords", "domain", "www.github.com"]).unwrap();
        let mut out = Vec::new();
        dispatch(
            cli.command,
            || bail!("no config directory"),
            &mut "".as_bytes(),
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "github.com\n");
    }

    #[test]
    fn settings_commands_need_data_dir() {
        let cli = Cli::try_parse_from(["unique-passwords", "settings", "show"]).unwrap();
        let result = dispatch(
            cli.command,
            || bail!("no config directory"),
            &mut "".as_bytes(),
            &mut Vec::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn data_dir_prefers_explicit_then_config_dir() {
        let explicit = resolve_data_dir(Some("/tmp/up".into()), Some("/cfg".into())).unwrap();
        assert_eq!(explicit, Path::new("/tmp/up"));
        let fallback = resolve_data_dir(None, Some("/cfg".into())).unwrap();
        assert_eq!(fallback, Path::new("/cfg/unique-passwords"));
        assert!(resolve_data_dir(None, None).is_err());
    }

    #[test]
    fn cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["unique-passwords", "export"]).is_err());
    }
}
