//! `unique-passwords-core`: deterministic password derivation for Unique Passwords.
//!
//! No I/O and no logging happen in this crate.
//! Every function here is pure; the same inputs always produce the same output.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod charset;
pub mod derivation;
pub mod domain;
pub mod error;

pub use charset::{CharTables, CharacterClasses, Charset};
pub use derivation::{
    derive, DerivationRequest, DerivationResult, HashAlgorithm, DEFAULT_COST_FACTOR, DEFAULT_LENGTH,
    SCRYPT_OUTPUT_LEN,
};
pub use domain::normalize_domain;
pub use error::DerivationError;
