//! Character classes and the ordered charset that hash bytes map onto.
//!
//! The concatenation order is fixed: lowercase, digits, uppercase, special.
//! Changing it changes which character a given hash byte selects, so every
//! previously derived password would change with it.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Default tables
// ---------------------------------------------------------------------------

/// Default lowercase table.
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

/// Default uppercase table.
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default digit table.
pub const DIGITS: &str = "0123456789";

/// Default special-character table (printable ASCII punctuation).
pub const SPECIAL: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which character classes a derived password may draw from.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterClasses {
    /// Include the lowercase table.
    pub lowercase: bool,
    /// Include the uppercase table.
    pub uppercase: bool,
    /// Include the digit table.
    pub digits: bool,
    /// Include the special table.
    pub special: bool,
}

impl CharacterClasses {
    /// Every class enabled.
    pub const ALL: Self = Self {
        lowercase: true,
        uppercase: true,
        digits: true,
        special: true,
    };

    /// Returns `true` if no class is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.lowercase || self.uppercase || self.digits || self.special)
    }
}

impl Default for CharacterClasses {
    fn default() -> Self {
        Self::ALL
    }
}

/// The concrete characters behind each class. User-editable in settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharTables {
    /// Characters used for the lowercase class.
    pub lowercase: String,
    /// Characters used for the uppercase class.
    pub uppercase: String,
    /// Characters used for the digit class.
    pub digits: String,
    /// Characters used for the special class.
    pub special: String,
}

impl Default for CharTables {
    fn default() -> Self {
        Self {
            lowercase: LOWERCASE.into(),
            uppercase: UPPERCASE.into(),
            digits: DIGITS.into(),
            special: SPECIAL.into(),
        }
    }
}

/// Ordered charset. May be empty; [`crate::derive`] rejects an empty one.
///
/// Indexed by Unicode scalar value, so a character outside the Basic
/// Multilingual Plane counts once. Tables built only from BMP characters
/// (all the defaults) map exactly as a UTF-16 indexed table would; astral
/// characters would split into lone surrogates there, which a `String`
/// cannot hold.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Charset {
    chars: Vec<char>,
}

impl Charset {
    /// Concatenate the selected tables in the fixed order
    /// lowercase, digits, uppercase, special.
    #[must_use]
    pub fn from_classes(classes: CharacterClasses, tables: &CharTables) -> Self {
        let mut chars = Vec::new();
        for (enabled, table) in [
            (classes.lowercase, &tables.lowercase),
            (classes.digits, &tables.digits),
            (classes.uppercase, &tables.uppercase),
            (classes.special, &tables.special),
        ] {
            if enabled {
                chars.extend(table.chars());
            }
        }
        Self { chars }
    }

    /// Use `chars` verbatim, in the given order.
    #[must_use]
    pub fn from_chars(chars: &str) -> Self {
        Self {
            chars: chars.chars().collect(),
        }
    }

    /// Number of characters (duplicates included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns `true` if the charset has no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Returns `true` if `c` is part of the charset.
    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Map one hash byte to a character: `charset[b mod len]`.
    ///
    /// Returns `None` only for an empty charset.
    #[must_use]
    pub fn map_byte(&self, b: u8) -> Option<char> {
        let index = usize::from(b).checked_rem(self.chars.len())?;
        self.chars.get(index).copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenation_order_is_lower_digits_upper_special() {
        let charset = Charset::from_classes(CharacterClasses::ALL, &CharTables::default());
        let expected: String = [LOWERCASE, DIGITS, UPPERCASE, SPECIAL].concat();
        assert_eq!(charset, Charset::from_chars(&expected));
        assert_eq!(charset.len(), 26 + 10 + 26 + 32);
    }

    #[test]
    fn no_class_selected_yields_empty_charset() {
        let classes = CharacterClasses {
            lowercase: false,
            uppercase: false,
            digits: false,
            special: false,
        };
        assert!(classes.is_empty());
        let charset = Charset::from_classes(classes, &CharTables::default());
        assert!(charset.is_empty());
        assert_eq!(charset.map_byte(7), None);
    }

    #[test]
    fn astral_characters_count_as_one_entry() {
        let charset = Charset::from_chars("a\u{1F511}b");
        assert_eq!(charset.len(), 3);
        assert_eq!(charset.map_byte(1), Some('\u{1F511}'));
        assert_eq!(charset.map_byte(2), Some('b'));
        assert_eq!(charset.map_byte(4), Some('\u{1F511}'));
    }

    #[test]
    fn map_byte_wraps_modulo_length() {
        let charset = Charset::from_chars("abc");
        assert_eq!(charset.map_byte(0), Some('a'));
        assert_eq!(charset.map_byte(4), Some('b'));
        assert_eq!(charset.map_byte(255), Some('a'));
    }

    #[test]
    fn custom_tables_are_honoured() {
        let tables = CharTables {
            lowercase: "xyz".into(),
            digits: "7".into(),
            ..CharTables::default()
        };
        let classes = CharacterClasses {
            lowercase: true,
            uppercase: false,
            digits: true,
            special: false,
        };
        let charset = Charset::from_classes(classes, &tables);
        assert_eq!(charset, Charset::from_chars("xyz7"));
        assert!(charset.contains('7'));
        assert!(!charset.contains('a'));
    }

    #[test]
    fn non_ascii_tables_map_whole_chars() {
        let charset = Charset::from_chars("éü");
        assert_eq!(charset.len(), 2);
        assert_eq!(charset.map_byte(1), Some('ü'));
    }

    #[test]
    fn character_classes_serde_uses_camel_case() {
        let json = serde_json::to_string(&CharacterClasses::ALL).unwrap();
        assert_eq!(
            json,
            r#"{"lowercase":true,"uppercase":true,"digits":true,"special":true}"#
        );
    }
}
