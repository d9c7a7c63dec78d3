//! Shared types for the Wikimapia Telegram bot
//!
//! This crate provides the domain types used by the API client and the bot:
//! conversation identifiers, places and their details, locales, the emoji
//! index codec and the reply keyboard model.

pub mod conversation;
pub mod emoji;
pub mod keyboard;
pub mod locale;
pub mod place;

// Re-export commonly used types
pub use conversation::ConversationId;
pub use keyboard::{KeyboardButton, ReplyKeyboard};
pub use locale::Locale;
pub use place::{Photo, Place, PlaceDetail, PlaceId};
