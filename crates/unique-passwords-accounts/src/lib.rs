//! `unique-passwords-accounts`: settings and the account cache.
//!
//! Everything stored here is non-secret: domains, usernames and generation
//! parameters. The master password and derived passwords never reach this
//! crate's storage.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod accounts;
pub mod error;
pub mod settings;

pub use accounts::{AccountCache, CachedAccountRecord, GenerationParameters};
pub use error::AccountsError;
pub use settings::Settings;
