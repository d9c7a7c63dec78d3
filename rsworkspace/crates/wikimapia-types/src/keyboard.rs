//! Reply keyboard model, independent of any bot toolkit

use serde::{Deserialize, Serialize};

use crate::emoji;
use crate::locale::Locale;

/// Number of selection buttons per keyboard row
pub const ROW_WIDTH: usize = 3;

/// Reply keyboard button
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
    /// Tapping the button shares the user's location
    #[serde(default)]
    pub request_location: bool,
}

impl KeyboardButton {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_location: false,
        }
    }

    pub fn location(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_location: true,
        }
    }
}

/// Reply keyboard markup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<KeyboardButton>>,
    /// Ask the client to shrink the keyboard to fit its buttons
    #[serde(default)]
    pub resize: bool,
}

impl ReplyKeyboard {
    /// Create a resizable keyboard with rows of buttons
    pub fn new(rows: Vec<Vec<KeyboardButton>>) -> Self {
        Self { rows, resize: true }
    }

    /// Share-location button on its own row, followed by one emoji button per
    /// selectable place (at most [`emoji::MAX_ORDINAL`]).
    pub fn places(share_location_label: impl Into<String>, count: usize) -> Self {
        let mut rows = vec![vec![KeyboardButton::location(share_location_label)]];
        rows.extend(selection_rows(count, ROW_WIDTH).into_iter().map(|row| {
            row.into_iter()
                .filter_map(emoji::encode)
                .map(KeyboardButton::text)
                .collect()
        }));
        Self::new(rows)
    }

    /// One row with a flag per supported language
    pub fn languages() -> Self {
        let row = Locale::ALL
            .into_iter()
            .map(|locale| KeyboardButton::text(locale.flag()))
            .collect();
        Self::new(vec![row])
    }

    /// Number of emoji selection buttons on the keyboard
    pub fn selectable_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|button| emoji::decode(&button.text).is_some())
            .count()
    }
}

/// Lay out the ordinals `1..=min(count, MAX_ORDINAL)` in rows of `width`.
pub fn selection_rows(count: usize, width: usize) -> Vec<Vec<usize>> {
    let ordinals: Vec<usize> = (1..=count.min(emoji::MAX_ORDINAL)).collect();
    ordinals
        .chunks(width.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_rows_empty() {
        assert!(selection_rows(0, ROW_WIDTH).is_empty());
    }

    #[test]
    fn test_selection_rows_partial_last_row() {
        assert_eq!(
            selection_rows(4, ROW_WIDTH),
            vec![vec![1, 2, 3], vec![4]]
        );
    }

    #[test]
    fn test_selection_rows_capped_at_nine() {
        let rows = selection_rows(12, ROW_WIDTH);
        assert_eq!(rows, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]);
    }

    #[test]
    fn test_places_keyboard_without_selections() {
        let kb = ReplyKeyboard::places("Share location", 0);
        assert_eq!(kb.rows.len(), 1);
        assert_eq!(kb.rows[0], vec![KeyboardButton::location("Share location")]);
        assert!(kb.resize);
        assert_eq!(kb.selectable_count(), 0);
    }

    #[test]
    fn test_places_keyboard_buttons_in_ordinal_order() {
        let kb = ReplyKeyboard::places("Share", 5);
        assert_eq!(kb.rows.len(), 3);
        let texts: Vec<&str> = kb.rows[1..]
            .iter()
            .flatten()
            .map(|b| b.text.as_str())
            .collect();
        assert_eq!(texts, vec!["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣"]);
        assert!(kb.rows[1..].iter().flatten().all(|b| !b.request_location));
    }

    #[test]
    fn test_places_keyboard_never_exceeds_nine_buttons() {
        let kb = ReplyKeyboard::places("Share", 10);
        assert_eq!(kb.selectable_count(), 9);
    }

    #[test]
    fn test_languages_keyboard() {
        let kb = ReplyKeyboard::languages();
        assert_eq!(kb.rows.len(), 1);
        let texts: Vec<&str> = kb.rows[0].iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["🇷🇺", "🇺🇸"]);
    }
}
