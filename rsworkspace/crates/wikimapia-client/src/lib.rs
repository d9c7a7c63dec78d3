//! Wikimapia API client
//!
//! Thin typed wrapper over the two API functions the bot needs: the nearby
//! search (`place.getnearest`) and the place detail lookup (`place.getbyid`).

pub mod client;
pub mod config;
pub mod error;

pub use client::WikimapiaClient;
pub use config::WikimapiaConfig;
pub use error::{Error, Result};
