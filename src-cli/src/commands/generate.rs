//! `generate`: derive and print one site password.

use std::io::{BufRead, Write};
use std::path::Path;

use clap::Args;
use secrecy::SecretString;
use unique_passwords_accounts::{GenerationParameters, Settings};
use unique_passwords_core::{derive, normalize_domain, DerivationResult};

use super::{read_secret, save_settings, ParameterOverrides};

/// Arguments for `generate`.
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Page URL or bare host.
    #[arg(long)]
    pub url: String,
    /// Keep subdomains instead of the last two labels.
    #[arg(long)]
    pub keep_subdomain: bool,
    /// Account username (defaults to the single cached one for the domain).
    #[arg(long)]
    pub username: Option<String>,
    #[command(flatten)]
    pub overrides: ParameterOverrides,
}

/// A derived password and where it belongs.
#[derive(Debug)]
pub struct Generated {
    /// Normalized domain.
    pub domain: String,
    /// Username the password was derived for.
    pub username: String,
    /// Parameters actually used.
    pub parameters: GenerationParameters,
    /// The password.
    pub password: DerivationResult,
}

/// Derive a password for (`domain`, `username`) with cached or global
/// parameters plus `overrides`, then remember the account when caching is on.
///
/// Returns the parameters used, the password, and whether the cache changed.
pub(crate) fn derive_for_account(
    settings: &mut Settings,
    domain: &str,
    username: &str,
    overrides: &ParameterOverrides,
    secret: SecretString,
) -> anyhow::Result<(GenerationParameters, DerivationResult, bool)> {
    let parameters = overrides.apply(settings.generation_parameters(domain, username));
    let request = settings.derivation_request(domain, username, secret, parameters)?;
    let password = derive(&request)?;
    tracing::info!(domain, algorithm = %request.algorithm, length = password.len(), "password derived");
    let cached = settings.save_account(domain, username, parameters);
    Ok((parameters, password, cached))
}

/// Resolve the account and derive its password.
///
/// Returns the result and whether the account cache changed.
///
/// # Errors
///
/// Returns derivation failures (unknown algorithm, empty charset, zero
/// length, bad scrypt cost).
pub fn generate(
    settings: &mut Settings,
    args: &GenerateArgs,
    secret: SecretString,
) -> anyhow::Result<(Generated, bool)> {
    let domain = normalize_domain(&args.url, args.keep_subdomain);
    let username = match &args.username {
        Some(username) => username.clone(),
        None => settings
            .cached_accounts
            .suggested_username(&domain)
            .unwrap_or_default()
            .to_string(),
    };
    let (parameters, password, cached) =
        derive_for_account(settings, &domain, &username, &args.overrides, secret)?;
    Ok((
        Generated {
            domain,
            username,
            parameters,
            password,
        },
        cached,
    ))
}

/// Read the master password, print the derived one, persist the cache.
///
/// # Errors
///
/// Returns derivation, stdin, stdout or settings-file failures.
pub fn execute(
    data_dir: &Path,
    args: &GenerateArgs,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<()> {
    let mut settings = Settings::load(data_dir);
    let secret = read_secret(input)?;
    let (generated, cached) = generate(&mut settings, args, secret)?;
    writeln!(output, "{}", generated.password.expose())?;
    if cached {
        save_settings(&settings, data_dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(url: &str, username: Option<&str>) -> GenerateArgs {
        GenerateArgs {
            url: url.into(),
            keep_subdomain: false,
            username: username.map(str::to_string),
            overrides: ParameterOverrides::default(),
        }
    }

    fn secret() -> SecretString {
        SecretString::from("s3cr3t".to_owned())
    }

    #[test]
    fn generate_matches_known_vector_and_caches() {
        let mut settings = Settings::default();
        let mut args = args("https://www.github.com/login", Some("alice"));
        args.overrides = ParameterOverrides {
            length: Some(12),
            uppercase: Some(false),
            special: Some(false),
            ..ParameterOverrides::default()
        };

        let (generated, cached) = generate(&mut settings, &args, secret()).unwrap();
        assert_eq!(generated.domain, "github.com");
        assert_eq!(generated.password.expose(), "y0xfyll37iy6");
        assert!(cached);

        let record = settings.cached_accounts.find("github.com", "alice").unwrap();
        assert_eq!(record.password_length, 12);
        assert!(!record.use_uppercase);
    }

    #[test]
    fn cached_parameters_are_reused() {
        let mut settings = Settings::default();
        let mut first = args("github.com", Some("alice"));
        first.overrides.length = Some(12);
        first.overrides.uppercase = Some(false);
        first.overrides.special = Some(false);
        let (before, _) = generate(&mut settings, &first, secret()).unwrap();

        let (after, _) = generate(&mut settings, &args("github.com", Some("alice")), secret()).unwrap();
        assert_eq!(before.password, after.password);
        assert_eq!(after.parameters.length, 12);
    }

    #[test]
    fn username_defaults_to_single_cached_account() {
        let mut settings = Settings::default();
        generate(&mut settings, &args("github.com", Some("alice")), secret()).unwrap();

        let (generated, _) = generate(&mut settings, &args("github.com", None), secret()).unwrap();
        assert_eq!(generated.username, "alice");

        let (other, _) = generate(&mut settings, &args("gitlab.com", None), secret()).unwrap();
        assert_eq!(other.username, "");
    }

    #[test]
    fn disabled_cache_stores_nothing() {
        let mut settings = Settings {
            global_cache_accounts: false,
            ..Settings::default()
        };
        let (_, cached) = generate(&mut settings, &args("github.com", Some("alice")), secret()).unwrap();
        assert!(!cached);
        assert!(settings.cached_accounts.is_empty());
    }

    #[test]
    fn empty_charset_fails_without_caching() {
        let mut settings = Settings::default();
        let mut args = args("github.com", Some("alice"));
        args.overrides = ParameterOverrides {
            lowercase: Some(false),
            uppercase: Some(false),
            digits: Some(false),
            special: Some(false),
            ..ParameterOverrides::default()
        };
        assert!(generate(&mut settings, &args, secret()).is_err());
        assert!(settings.cached_accounts.is_empty());
    }

    #[test]
    fn execute_prints_password_and_persists_cache() {
        let dir = TempDir::new().unwrap();
        let mut input = "s3cr3t\n".as_bytes();
        let mut out = Vec::new();
        let mut args = args("github.com", Some("alice"));
        args.overrides.digits = Some(true);
        args.overrides.length = Some(16);
        args.overrides.lowercase = Some(false);
        args.overrides.uppercase = Some(false);
        args.overrides.special = Some(false);

        execute(dir.path(), &args, &mut input, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0295475578066807\n");

        let settings = Settings::load(dir.path());
        assert!(settings.cached_accounts.find("github.com", "alice").is_some());
    }
}
