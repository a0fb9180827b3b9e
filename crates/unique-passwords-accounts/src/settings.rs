//! Global settings: stored as plain JSON in the data directory.
//!
//! Holds the generation defaults, the character tables and the account
//! cache. Nothing in here is secret.

use std::fs;
use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use unique_passwords_core::charset::{DIGITS, LOWERCASE, SPECIAL, UPPERCASE};
use unique_passwords_core::{
    CharTables, CharacterClasses, Charset, DerivationError, DerivationRequest, HashAlgorithm,
    DEFAULT_COST_FACTOR, DEFAULT_LENGTH,
};

use crate::accounts::{AccountCache, CachedAccountRecord, GenerationParameters};
use crate::error::AccountsError;

// ── Settings ───────────────────────────────────────────────────────

/// Application settings.
///
/// Persisted to `{data_dir}/settings.json`. All fields have defaults so a
/// partial file still loads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Hash algorithm name (`"sha-1"`, `"sha-256"`, `"sha-384"`,
    /// `"sha-512"` or `"scrypt"`). Kept as text so an unknown name still
    /// loads and is reported when used.
    #[serde(default = "default_hash_algorithm")]
    pub global_hash_algorithm: String,

    /// scrypt work factor `N`.
    #[serde(default = "default_cost_factor")]
    pub global_cost_factor: u32,

    /// Length used when no cached account matches.
    #[serde(default = "default_password_length")]
    pub global_password_length: usize,

    /// Remember generation parameters per account.
    #[serde(default = "default_cache_accounts")]
    pub global_cache_accounts: bool,

    /// Lowercase table.
    #[serde(default = "default_lowercase")]
    pub lowercase_chars: String,

    /// Uppercase table.
    #[serde(default = "default_uppercase")]
    pub uppercase_chars: String,

    /// Digit table.
    #[serde(default = "default_numbers")]
    pub number_chars: String,

    /// Special table.
    #[serde(default = "default_special")]
    pub special_chars: String,

    /// Remembered accounts.
    #[serde(default)]
    pub cached_accounts: AccountCache,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            global_hash_algorithm: default_hash_algorithm(),
            global_cost_factor: default_cost_factor(),
            global_password_length: default_password_length(),
            global_cache_accounts: default_cache_accounts(),
            lowercase_chars: default_lowercase(),
            uppercase_chars: default_uppercase(),
            number_chars: default_numbers(),
            special_chars: default_special(),
            cached_accounts: AccountCache::default(),
        }
    }
}

fn default_hash_algorithm() -> String {
    HashAlgorithm::Sha256.as_str().into()
}
const fn default_cost_factor() -> u32 {
    DEFAULT_COST_FACTOR
}
const fn default_password_length() -> usize {
    DEFAULT_LENGTH
}
const fn default_cache_accounts() -> bool {
    true
}
fn default_lowercase() -> String {
    LOWERCASE.into()
}
fn default_uppercase() -> String {
    UPPERCASE.into()
}
fn default_numbers() -> String {
    DIGITS.into()
}
fn default_special() -> String {
    SPECIAL.into()
}

// ── Derivation parameters ──────────────────────────────────────────

impl Settings {
    /// The configured hash algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`DerivationError::AlgorithmUnavailable`] for unknown names.
    pub fn hash_algorithm(&self) -> Result<HashAlgorithm, DerivationError> {
        self.global_hash_algorithm.parse()
    }

    /// The configured character tables.
    #[must_use]
    pub fn char_tables(&self) -> CharTables {
        CharTables {
            lowercase: self.lowercase_chars.clone(),
            uppercase: self.uppercase_chars.clone(),
            digits: self.number_chars.clone(),
            special: self.special_chars.clone(),
        }
    }

    /// Parameters to pre-fill for (domain, username): the cached ones when
    /// exactly one record matches, otherwise the global length with every
    /// class enabled.
    #[must_use]
    pub fn generation_parameters(&self, domain: &str, username: &str) -> GenerationParameters {
        self.cached_accounts.find(domain, username).map_or(
            GenerationParameters {
                length: self.global_password_length,
                classes: CharacterClasses::ALL,
            },
            CachedAccountRecord::parameters,
        )
    }

    /// Remember the parameters of a successful generation.
    ///
    /// Returns `false` (and stores nothing) when caching is disabled.
    pub fn save_account(
        &mut self,
        domain: &str,
        username: &str,
        parameters: GenerationParameters,
    ) -> bool {
        if !self.global_cache_accounts {
            tracing::debug!("account caching disabled, not saving");
            return false;
        }
        tracing::debug!(domain, username, length = parameters.length, "caching account");
        self.cached_accounts
            .upsert(CachedAccountRecord::new(domain, username, parameters));
        true
    }

    /// Build the derivation request for one generation.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsError::Derivation`] if the configured algorithm is
    /// unknown.
    pub fn derivation_request(
        &self,
        domain: &str,
        username: &str,
        secret: SecretString,
        parameters: GenerationParameters,
    ) -> Result<DerivationRequest, AccountsError> {
        let charset = Charset::from_classes(parameters.classes, &self.char_tables());
        Ok(DerivationRequest::new(domain, username, secret)
            .with_algorithm(self.hash_algorithm()?)
            .with_cost_factor(self.global_cost_factor)
            .with_charset(charset)
            .with_length(parameters.length))
    }
}

// ── File I/O ───────────────────────────────────────────────────────

const SETTINGS_FILE: &str = "settings.json";
const CORRUPT_FILE: &str = "settings.json.corrupt";

impl Settings {
    /// Load settings from `{data_dir}/settings.json`.
    ///
    /// Returns [`Default::default()`] when the file is missing or
    /// contains invalid JSON. An unparsable file is first renamed to
    /// `settings.json.corrupt` so a later [`Settings::save`] cannot
    /// overwrite the cached accounts and tables it still holds.
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            let backup = data_dir.join(CORRUPT_FILE);
            match fs::rename(&path, &backup) {
                Ok(()) => tracing::warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    "settings file unreadable, moved aside and using defaults: {e}"
                ),
                Err(rename_err) => tracing::error!(
                    path = %path.display(),
                    "settings file unreadable ({e}) and could not be moved aside: {rename_err}"
                ),
            }
            Self::default()
        })
    }

    /// Persist settings to `{data_dir}/settings.json`.
    ///
    /// Writes to a `.tmp` file first, then renames it over the target.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsError::Io`] if the directory does not exist or the
    /// file system rejects the write/rename.
    pub fn save(&self, data_dir: &Path) -> Result<(), AccountsError> {
        let path = data_dir.join(SETTINGS_FILE);
        let tmp = data_dir.join(".settings.json.tmp");

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AccountsError::Serialization(e.to_string()))?;

        fs::write(&tmp, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, &path)?;

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────
