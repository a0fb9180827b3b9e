//! Document error types for `unique-passwords-discovery`.
//!
//! Finding no username field is not an error; the search returns `None`.

use thiserror::Error;

/// Errors produced while loading or addressing a [`crate::Document`].
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The element tree JSON could not be parsed.
    #[error("invalid document: {0}")]
    Parse(String),

    /// No element carries the requested `id` attribute.
    #[error("element not found: #{0}")]
    ElementNotFound(String),
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
