//! Conversation languages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language used for every rendered text of a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    /// All supported locales, in the order they are offered to the user
    pub const ALL: [Locale; 2] = [Locale::Ru, Locale::En];

    /// Two-letter language code
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }

    /// Parse a two-letter language code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "en" => Some(Locale::En),
            "ru" => Some(Locale::Ru),
            _ => None,
        }
    }

    /// Flag emoji the user taps to pick this language
    pub fn flag(&self) -> &'static str {
        match self {
            Locale::En => "\u{1f1fa}\u{1f1f8}",
            Locale::Ru => "\u{1f1f7}\u{1f1fa}",
        }
    }

    /// Match an inbound message against the language selection tokens
    pub fn from_flag(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.flag() == text)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
