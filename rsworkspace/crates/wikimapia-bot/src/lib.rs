//! Wikimapia Telegram bot
//!
//! A shared location produces an emoji-numbered list of nearby Wikimapia
//! places; tapping an emoji button sends that place's description and a few
//! of its photos. Each conversation keeps its chosen language across restarts.

pub mod analytics;
pub mod config;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod i18n;
pub mod locale;
pub mod nats;
pub mod nats_impls;
pub mod photos;
pub mod render;
pub mod selection;
pub mod session;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use engine::{Engine, Event, Reply, TextFormat};
pub use errors::BotError;
