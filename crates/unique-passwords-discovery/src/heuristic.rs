//! Two-tier username field heuristic.
//!
//! 1. **Strict**: a text/email input that is `type="email"` or whose `id`,
//!    `class` or `name` contains one of the label words (case-insensitive).
//! 2. **Loose**: any text/email input.
//!
//! The strict tier runs first over the whole reachable tree; the loose tier
//! only runs when the strict one finds nothing.

use crate::search::{find_nearest, SearchOptions};
use crate::tree::ElementTree;

/// Default label vocabulary.
pub const DEFAULT_LABELS: [&str; 4] = ["email", "user", "login", "card"];

/// Attributes inspected for label words.
pub const LABEL_ATTRIBUTES: [&str; 3] = ["id", "class", "name"];

/// Valid `<input type>` values that are neither `text` nor `email`.
/// Anything else, including unknown values, behaves as `text` in a browser.
const NON_TEXT_TYPES: [&str; 20] = [
    "button",
    "checkbox",
    "color",
    "date",
    "datetime-local",
    "file",
    "hidden",
    "image",
    "month",
    "number",
    "password",
    "radio",
    "range",
    "reset",
    "search",
    "submit",
    "tel",
    "time",
    "url",
    "week",
];

/// `true` for `<input>` elements whose effective type is `text` or `email`:
/// no type, `text`, `email`, or a value browsers do not recognise.
pub fn is_text_input<T: ElementTree>(tree: &T, element: T::Element) -> bool {
    if !tree.tag_name(element).eq_ignore_ascii_case("input") {
        return false;
    }
    input_type(tree, element).is_none_or(|t| !NON_TEXT_TYPES.contains(&t.as_str()))
}

fn input_type<T: ElementTree>(tree: &T, element: T::Element) -> Option<String> {
    tree.attribute(element, "type")
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
}

/// Configurable username-field heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameHeuristic {
    /// Label words, matched as lowercase substrings.
    pub labels: Vec<String>,
    /// Attributes searched for label words.
    pub attributes: Vec<String>,
    /// Search options shared by both tiers.
    pub options: SearchOptions,
}

impl Default for UsernameHeuristic {
    fn default() -> Self {
        Self {
            labels: DEFAULT_LABELS.iter().map(|&l| l.to_string()).collect(),
            attributes: LABEL_ATTRIBUTES.iter().map(|&a| a.to_string()).collect(),
            options: SearchOptions::default(),
        }
    }
}

impl UsernameHeuristic {
    /// Strict tier: labelled text input or any email input.
    pub fn is_strict_match<T: ElementTree>(&self, tree: &T, element: T::Element) -> bool {
        if !is_text_input(tree, element) {
            return false;
        }
        if input_type(tree, element).as_deref() == Some("email") {
            return true;
        }
        self.attributes.iter().any(|attr| {
            tree.attribute(element, attr).is_some_and(|value| {
                let value = value.to_lowercase();
                self.labels
                    .iter()
                    .any(|label| value.contains(&label.to_lowercase()))
            })
        })
    }

    /// Loose tier: any text input.
    pub fn is_loose_match<T: ElementTree>(&self, tree: &T, element: T::Element) -> bool {
        is_text_input(tree, element)
    }

    /// Nearest strict match only.
    pub fn find_strict<T: ElementTree>(
        &self,
        tree: &T,
        password_field: T::Element,
    ) -> Option<T::Element> {
        find_nearest(
            tree,
            password_field,
            |t, el| self.is_strict_match(t, el),
            self.options,
        )
    }

    /// Nearest loose match only.
    pub fn find_loose<T: ElementTree>(
        &self,
        tree: &T,
        password_field: T::Element,
    ) -> Option<T::Element> {
        find_nearest(
            tree,
            password_field,
            |t, el| self.is_loose_match(t, el),
            self.options,
        )
    }

    /// The username field for `password_field`: strict tier first, then
    /// loose. `None` is a normal outcome (password-only forms).
    pub fn find_username_field<T: ElementTree>(
        &self,
        tree: &T,
        password_field: T::Element,
    ) -> Option<T::Element> {
        self.find_strict(tree, password_field)
            .or_else(|| self.find_loose(tree, password_field))
    }
}
