//! Error types for `unique-passwords-accounts`.

use thiserror::Error;
use unique_passwords_core::DerivationError;

/// Errors produced by settings and account cache operations.
#[derive(Debug, Error)]
pub enum AccountsError {
    /// Building a derivation request from settings failed.
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    /// No cached account for this (domain, username).
    #[error("account not found: {username}@{domain}")]
    AccountNotFound {
        /// Domain that was looked up.
        domain: String,
        /// Username that was looked up.
        username: String,
    },

    /// Settings could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
