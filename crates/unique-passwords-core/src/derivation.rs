//! Deterministic site password derivation.
//!
//! This module provides:
//! - [`derive`]: map (domain, username, secret, parameters) to a password
//! - [`DerivationRequest`]: the immutable input tuple
//! - [`HashAlgorithm`]: SHA-1/256/384/512 digests or scrypt
//!
//! # Byte mapping
//!
//! Every raw output byte `b` becomes `charset[b mod len(charset)]`. The
//! mapping is biased whenever the charset length does not divide 256. The
//! bias is part of the output format: switching to rejection sampling would
//! change every password ever derived.
//!
//! # Truncation
//!
//! The result holds `min(length, raw_len)` characters. A SHA-1 request for
//! 64 characters yields 20; it is never padded.

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::charset::{CharTables, CharacterClasses, Charset};
use crate::error::DerivationError;

/// scrypt derived-key length in bytes.
pub const SCRYPT_OUTPUT_LEN: usize = 20;

/// scrypt block size `r`.
const SCRYPT_BLOCK_SIZE: u32 = 8;

/// scrypt parallelism `p`.
const SCRYPT_PARALLELISM: u32 = 1;

/// Default scrypt work factor `N` (2^14).
pub const DEFAULT_COST_FACTOR: u32 = 16_384;

/// Default requested password length.
pub const DEFAULT_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Hashing primitive used to produce the raw bytes.
///
/// Serialized with the names the settings file has always used
/// (`"sha-1"`, `"sha-256"`, `"sha-384"`, `"sha-512"`, `"scrypt"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-1, 20-byte output.
    #[serde(rename = "sha-1")]
    Sha1,
    /// SHA-256, 32-byte output.
    #[serde(rename = "sha-256")]
    Sha256,
    /// SHA-384, 48-byte output.
    #[serde(rename = "sha-384")]
    Sha384,
    /// SHA-512, 64-byte output.
    #[serde(rename = "sha-512")]
    Sha512,
    /// scrypt with `r = 8`, `p = 1` and a 20-byte key.
    #[serde(rename = "scrypt")]
    Scrypt,
}

impl HashAlgorithm {
    /// Number of raw bytes this algorithm produces, which caps the
    /// password length.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha1 | Self::Scrypt => 20,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Settings-file name of the algorithm.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "sha-1",
            Self::Sha256 => "sha-256",
            Self::Sha384 => "sha-384",
            Self::Sha512 => "sha-512",
            Self::Scrypt => "scrypt",
        }
    }

    const fn digest(self) -> Option<&'static ring::digest::Algorithm> {
        match self {
            Self::Sha1 => Some(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY),
            Self::Sha256 => Some(&ring::digest::SHA256),
            Self::Sha384 => Some(&ring::digest::SHA384),
            Self::Sha512 => Some(&ring::digest::SHA512),
            Self::Scrypt => None,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = DerivationError;

    /// Case-insensitive; accepts the hyphen-less spellings too (`sha256`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha-1" | "sha1" => Ok(Self::Sha1),
            "sha-256" | "sha256" => Ok(Self::Sha256),
            "sha-384" | "sha384" => Ok(Self::Sha384),
            "sha-512" | "sha512" => Ok(Self::Sha512),
            "scrypt" => Ok(Self::Scrypt),
            other => Err(DerivationError::AlgorithmUnavailable(format!(
                "unsupported hash algorithm '{other}'"
            ))),
        }
    }
}

/// Everything needed to derive one site password.
///
/// `domain` is expected to be normalized already (see
/// [`crate::normalize_domain`]): the digest input concatenates domain,
/// username and secret with no separator.
pub struct DerivationRequest {
    /// Normalized registrable domain, e.g. `github.com`.
    pub domain: String,
    /// Account name on that domain.
    pub username: String,
    /// Master password. Never persisted, never logged.
    pub secret: SecretString,
    /// Hashing primitive.
    pub algorithm: HashAlgorithm,
    /// scrypt `N`; ignored by the digest algorithms.
    pub cost_factor: u32,
    /// Ordered characters that output bytes map onto.
    pub charset: Charset,
    /// Requested password length (at least 1).
    pub length: usize,
}

impl DerivationRequest {
    /// Request with SHA-256, every character class and the default length.
    #[must_use]
    pub fn new(
        domain: impl Into<String>,
        username: impl Into<String>,
        secret: SecretString,
    ) -> Self {
        Self {
            domain: domain.into(),
            username: username.into(),
            secret,
            algorithm: HashAlgorithm::Sha256,
            cost_factor: DEFAULT_COST_FACTOR,
            charset: Charset::from_classes(CharacterClasses::ALL, &CharTables::default()),
            length: DEFAULT_LENGTH,
        }
    }

    /// Replace the hashing primitive.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Replace the scrypt work factor.
    #[must_use]
    pub fn with_cost_factor(mut self, cost_factor: u32) -> Self {
        self.cost_factor = cost_factor;
        self
    }

    /// Replace the charset.
    #[must_use]
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Replace the requested length.
    #[must_use]
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }
}

impl fmt::Debug for DerivationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivationRequest")
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("secret", &"***")
            .field("algorithm", &self.algorithm)
            .field("cost_factor", &self.cost_factor)
            .field("charset_len", &self.charset.len())
            .field("length", &self.length)
            .finish()
    }
}

/// A derived password. Zeroized on drop, masked in `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivationResult {
    password: String,
}

impl DerivationResult {
    /// The password itself. Keep exposure short-lived.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.password
    }

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.password.chars().count()
    }

    /// Returns `true` if the password is empty (never the case for a
    /// successful derivation).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.password.is_empty()
    }
}

impl fmt::Debug for DerivationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivationResult(***)")
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the site password for `request`.
///
/// # Errors
///
/// Returns [`DerivationError::InvalidRequest`], before any hashing, if:
/// - the charset is empty
/// - `length` is zero
/// - the algorithm is scrypt and `cost_factor` is not a power of two ≥ 2
///
/// Returns [`DerivationError::AlgorithmUnavailable`] if scrypt rejects its
/// parameters.
pub fn derive(request: &DerivationRequest) -> Result<DerivationResult, DerivationError> {
    validate(request)?;

    let raw = match request.algorithm.digest() {
        Some(algorithm) => digest_bytes(algorithm, request),
        None => scrypt_bytes(request)?,
    };

    let password = raw
        .iter()
        .take(request.length)
        .map(|&b| request.charset.map_byte(b))
        .collect::<Option<String>>()
        .ok_or_else(|| DerivationError::InvalidRequest("charset is empty".into()))?;

    Ok(DerivationResult { password })
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn validate(request: &DerivationRequest) -> Result<(), DerivationError> {
    if request.charset.is_empty() {
        return Err(DerivationError::InvalidRequest(
            "at least one character class must be selected".into(),
        ));
    }
    if request.length == 0 {
        return Err(DerivationError::InvalidRequest(
            "length must be at least 1".into(),
        ));
    }
    if request.algorithm == HashAlgorithm::Scrypt {
        scrypt_log_n(request.cost_factor)?;
    }
    Ok(())
}

/// `digest(domain ++ username ++ secret)`, no separators.
fn digest_bytes(
    algorithm: &'static ring::digest::Algorithm,
    request: &DerivationRequest,
) -> Zeroizing<Vec<u8>> {
    let mut ctx = ring::digest::Context::new(algorithm);
    ctx.update(request.domain.as_bytes());
    ctx.update(request.username.as_bytes());
    ctx.update(request.secret.expose_secret().as_bytes());
    Zeroizing::new(ctx.finish().as_ref().to_vec())
}

/// `scrypt(password = secret, salt = domain ++ username, N, r = 8, p = 1)`.
fn scrypt_bytes(request: &DerivationRequest) -> Result<Zeroizing<Vec<u8>>, DerivationError> {
    let log_n = scrypt_log_n(request.cost_factor)?;
    let params = scrypt::Params::new(
        log_n,
        SCRYPT_BLOCK_SIZE,
        SCRYPT_PARALLELISM,
        SCRYPT_OUTPUT_LEN,
    )
    .map_err(|e| DerivationError::AlgorithmUnavailable(format!("invalid scrypt params: {e}")))?;

    let mut salt = Zeroizing::new(Vec::with_capacity(
        request
            .domain
            .len()
            .saturating_add(request.username.len()),
    ));
    salt.extend_from_slice(request.domain.as_bytes());
    salt.extend_from_slice(request.username.as_bytes());

    let mut output = Zeroizing::new(vec![0u8; SCRYPT_OUTPUT_LEN]);
    scrypt::scrypt(
        request.secret.expose_secret().as_bytes(),
        &salt,
        &params,
        &mut output,
    )
    .map_err(|e| DerivationError::AlgorithmUnavailable(format!("scrypt derivation failed: {e}")))?;

    Ok(output)
}

/// `log2(N)` for scrypt. `N` must be a power of two and at least 2.
fn scrypt_log_n(cost_factor: u32) -> Result<u8, DerivationError> {
    if cost_factor < 2 || !cost_factor.is_power_of_two() {
        return Err(DerivationError::InvalidRequest(format!(
            "scrypt cost factor must be a power of two >= 2, got {cost_factor}"
        )));
    }
    // trailing_zeros of a u32 is at most 31.
    #[allow(clippy::cast_possible_truncation)]
    Ok(cost_factor.trailing_zeros() as u8)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    fn github_request() -> DerivationRequest {
        DerivationRequest::new("github.com", "alice", secret("s3cr3t"))
    }

    #[test]
    fn derive_is_deterministic() {
        let a = derive(&github_request()).unwrap();
        let b = derive(&github_request()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sha256_lowercase_digits_fixture() {
        let request = github_request()
            .with_charset(Charset::from_chars("abcdefghijklmnopqrstuvwxyz0123456789"))
            .with_length(12);
        let result = derive(&request).unwrap();
        assert_eq!(result.expose(), "y0xfyll37iy6");
    }

    #[test]
    fn length_is_capped_by_raw_output() {
        let request = github_request()
            .with_algorithm(HashAlgorithm::Sha1)
            .with_length(64);
        assert_eq!(derive(&request).unwrap().len(), 20);

        let request = github_request()
            .with_algorithm(HashAlgorithm::Sha512)
            .with_length(10);
        assert_eq!(derive(&request).unwrap().len(), 10);
    }

    #[test]
    fn empty_charset_rejected() {
        let request = github_request().with_charset(Charset::default());
        let err = derive(&request).unwrap_err();
        assert!(matches!(err, DerivationError::InvalidRequest(_)));
        assert!(err.to_string().contains("character class"));
    }

    #[test]
    fn zero_length_rejected() {
        let request = github_request().with_length(0);
        assert!(matches!(
            derive(&request),
            Err(DerivationError::InvalidRequest(_))
        ));
    }

    #[test]
    fn empty_charset_rejected_before_expensive_scrypt() {
        // N = 2^30 would need 128 GiB; validation must fail first.
        let request = github_request()
            .with_algorithm(HashAlgorithm::Scrypt)
            .with_cost_factor(1 << 30)
            .with_charset(Charset::default());
        assert!(matches!(
            derive(&request),
            Err(DerivationError::InvalidRequest(_))
        ));
    }

    #[test]
    fn scrypt_cost_factor_must_be_power_of_two() {
        for bad in [0, 1, 3, 1000] {
            let request = github_request()
                .with_algorithm(HashAlgorithm::Scrypt)
                .with_cost_factor(bad);
            assert!(
                matches!(derive(&request), Err(DerivationError::InvalidRequest(_))),
                "cost factor {bad} should be rejected"
            );
        }
    }

    #[test]
    fn cost_factor_ignored_for_digests() {
        let a = derive(&github_request().with_cost_factor(3)).unwrap();
        let b = derive(&github_request()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn scrypt_produces_twenty_characters() {
        let request = github_request()
            .with_algorithm(HashAlgorithm::Scrypt)
            .with_cost_factor(16)
            .with_length(64);
        assert_eq!(derive(&request).unwrap().len(), SCRYPT_OUTPUT_LEN);
    }

    #[test]
    fn output_len_matches_algorithm() {
        assert_eq!(HashAlgorithm::Sha1.output_len(), 20);
        assert_eq!(HashAlgorithm::Sha256.output_len(), 32);
        assert_eq!(HashAlgorithm::Sha384.output_len(), 48);
        assert_eq!(HashAlgorithm::Sha512.output_len(), 64);
        assert_eq!(HashAlgorithm::Scrypt.output_len(), 20);
    }

    #[test]
    fn algorithm_parses_settings_names() {
        assert_eq!("sha-1".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha1));
        assert_eq!("SHA-256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert_eq!("sha384".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha384));
        assert_eq!("sha-512".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha512));
        assert_eq!("scrypt".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Scrypt));
    }

    #[test]
    fn unknown_algorithm_is_unavailable() {
        let err = "md5".parse::<HashAlgorithm>().unwrap_err();
        assert!(matches!(err, DerivationError::AlgorithmUnavailable(_)));
    }

    #[test]
    fn algorithm_serde_uses_settings_names() {
        for algorithm in [
            HashAlgorithm::Sha1,
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
            HashAlgorithm::Scrypt,
        ] {
            let json = serde_json::to_string(&algorithm).unwrap();
            assert_eq!(json, format!("\"{}\"", algorithm.as_str()));
        }
    }

    #[test]
    fn debug_output_masks_secrets() {
        let request = github_request();
        let debug = format!("{request:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("github.com"));

        let result = derive(&request).unwrap();
        assert_eq!(format!("{result:?}"), "DerivationResult(***)");
    }
}
