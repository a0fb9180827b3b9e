//! Derivation error types for `unique-passwords-core`.

use thiserror::Error;

/// Errors produced by the derivation engine.
///
/// Neither variant is transient: derivation is a pure function, so an
/// unchanged request fails the same way every time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DerivationError {
    /// Caller-correctable request problem (empty charset, zero length,
    /// bad cost factor). Reported before any hashing work starts.
    #[error("invalid derivation request: {0}")]
    InvalidRequest(String),

    /// The requested hashing primitive is unknown or rejected its parameters.
    #[error("algorithm unavailable: {0}")]
    AlgorithmUnavailable(String),
}
