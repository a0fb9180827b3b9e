//! `unique-passwords-discovery`: find the username field that belongs to a
//! password field, in a page whose structure is not known in advance.
//!
//! The search runs over any [`ElementTree`]; [`Document`] is the bundled
//! arena implementation used by the CLI and the tests. The search never
//! mutates the tree.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod document;
pub mod error;
pub mod heuristic;
pub mod search;
pub mod tree;

pub use document::{Document, ElementSpec, NodeId, Style};
pub use error::DocumentError;
pub use heuristic::{is_text_input, UsernameHeuristic, DEFAULT_LABELS, LABEL_ATTRIBUTES};
pub use search::{find_nearest, SearchOptions};
pub use tree::ElementTree;
