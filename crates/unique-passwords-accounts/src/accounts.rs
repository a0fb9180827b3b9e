//! Cached account records: generation parameters remembered per
//! (domain, username).
//!
//! Records are keyed by exact, case-sensitive (domain, username) match.
//! They are created or replaced after a successful generation, looked up to
//! pre-fill the next one, and removed only on explicit request.

use serde::{Deserialize, Serialize};
use unique_passwords_core::CharacterClasses;

use crate::error::AccountsError;

// ── Record ─────────────────────────────────────────────────────────

/// One remembered account. Contains no secret.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedAccountRecord {
    /// Normalized domain.
    pub domain: String,
    /// Username on that domain.
    pub username: String,
    /// Requested password length.
    pub password_length: usize,
    /// Lowercase class enabled.
    pub use_lowercase: bool,
    /// Uppercase class enabled.
    pub use_uppercase: bool,
    /// Digit class enabled.
    pub use_number: bool,
    /// Special class enabled.
    pub use_special: bool,
}

impl CachedAccountRecord {
    /// Record the parameters used for `domain` / `username`.
    #[must_use]
    pub fn new(domain: &str, username: &str, parameters: GenerationParameters) -> Self {
        Self {
            domain: domain.to_string(),
            username: username.to_string(),
            password_length: parameters.length,
            use_lowercase: parameters.classes.lowercase,
            use_uppercase: parameters.classes.uppercase,
            use_number: parameters.classes.digits,
            use_special: parameters.classes.special,
        }
    }

    /// The character classes this record enables.
    #[must_use]
    pub const fn classes(&self) -> CharacterClasses {
        CharacterClasses {
            lowercase: self.use_lowercase,
            uppercase: self.use_uppercase,
            digits: self.use_number,
            special: self.use_special,
        }
    }

    /// Length and classes as generation parameters.
    #[must_use]
    pub const fn parameters(&self) -> GenerationParameters {
        GenerationParameters {
            length: self.password_length,
            classes: self.classes(),
        }
    }

    fn is(&self, domain: &str, username: &str) -> bool {
        self.domain == domain && self.username == username
    }
}

/// Per-generation parameters a caller may pre-fill from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    /// Requested password length.
    pub length: usize,
    /// Enabled character classes.
    pub classes: CharacterClasses,
}

// ── Cache ──────────────────────────────────────────────────────────

/// Ordered list of cached records, serialized as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountCache {
    records: Vec<CachedAccountRecord>,
}

impl AccountCache {
    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[CachedAccountRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace every record matching (domain, username), or append.
    ///
    /// Returns `true` when an existing record was replaced.
    pub fn upsert(&mut self, record: CachedAccountRecord) -> bool {
        let mut replaced = false;
        for existing in &mut self.records {
            if existing.is(&record.domain, &record.username) {
                existing.clone_from(&record);
                replaced = true;
            }
        }
        if !replaced {
            self.records.push(record);
        }
        tracing::debug!(replaced, total = self.records.len(), "account cached");
        replaced
    }

    /// The record for exactly (domain, username), if there is exactly one.
    #[must_use]
    pub fn find(&self, domain: &str, username: &str) -> Option<&CachedAccountRecord> {
        let mut matches = self.records.iter().filter(|r| r.is(domain, username));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Some(record),
            _ => None,
        }
    }

    /// Every record for `domain`.
    pub fn for_domain<'a>(
        &'a self,
        domain: &'a str,
    ) -> impl Iterator<Item = &'a CachedAccountRecord> + 'a {
        self.records.iter().filter(move |r| r.domain == domain)
    }

    /// The username to pre-fill for `domain`: only when exactly one account
    /// is cached for it.
    #[must_use]
    pub fn suggested_username(&self, domain: &str) -> Option<&str> {
        let mut matches = self.records.iter().filter(|r| r.domain == domain);
        match (matches.next(), matches.next()) {
            (Some(record), None) => Some(record.username.as_str()),
            _ => None,
        }
    }

    /// Change the parameters of the cached (domain, username) record.
    ///
    /// # Errors
    ///
    /// Returns [`AccountsError::AccountNotFound`] if nothing matched.
    pub fn update(
        &mut self,
        domain: &str,
        username: &str,
        parameters: GenerationParameters,
    ) -> Result<(), AccountsError> {
        if !self.records.iter().any(|r| r.is(domain, username)) {
            return Err(AccountsError::AccountNotFound {
                domain: domain.to_string(),
                username: username.to_string(),
            });
        }
        self.upsert(CachedAccountRecord::new(domain, username, parameters));
        Ok(())
    }

    /// Remove the record(s) for (domain, username).
    ///
    /// # Errors
    ///
    /// Returns [`AccountsError::AccountNotFound`] if nothing matched.
    pub fn remove(&mut self, domain: &str, username: &str) -> Result<usize, AccountsError> {
        let before = self.records.len();
        self.records.retain(|r| !r.is(domain, username));
        let removed = before.saturating_sub(self.records.len());
        if removed == 0 {
            return Err(AccountsError::AccountNotFound {
                domain: domain.to_string(),
                username: username.to_string(),
            });
        }
        tracing::debug!(removed, "account removed from cache");
        Ok(removed)
    }
}

// ── Tests ──────────────────────────────────────────────────────────
