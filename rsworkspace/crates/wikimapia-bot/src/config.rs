//! Configuration management for wikimapia-bot

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use wikimapia_client::WikimapiaConfig;

use crate::nats::NatsConfig;
use crate::photos::DEFAULT_PHOTO_LIMIT;

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub telegram: TelegramBotConfig,
    #[serde(default)]
    pub wikimapia: WikimapiaConfig,
    pub nats: NatsConfig,
    #[serde(default)]
    pub photos: PhotosConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub i18n: I18nConfig,
}

/// Telegram bot specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramBotConfig {
    /// Bot token from BotFather
    #[serde(default = "default_bot_token")]
    pub bot_token: String,
}

/// Photo delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotosConfig {
    /// Download directory; the OS temp dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Photos sent per selected place
    #[serde(default = "default_photo_limit")]
    pub limit: usize,
}

/// Usage analytics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Translations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Directory with `<code>.json` files overriding the built-in catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN not set")?;

        let api_key = std::env::var("WIKIMAPIA_KEY").context("WIKIMAPIA_KEY not set")?;

        let nats_url = std::env::var("NATS_URL").unwrap_or_else(|_| "localhost:4222".to_string());

        let prefix = std::env::var("WIKIMAPIA_PREFIX").unwrap_or_else(|_| "prod".to_string());

        Ok(Config {
            telegram: TelegramBotConfig { bot_token },
            wikimapia: WikimapiaConfig::new(api_key),
            nats: NatsConfig::from_url(nats_url, prefix),
            photos: PhotosConfig::default(),
            analytics: AnalyticsConfig::default(),
            i18n: I18nConfig::default(),
        })
    }
}

impl PhotosConfig {
    /// Directory photos are downloaded into
    pub fn download_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn default_bot_token() -> String {
    std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default()
}

fn default_true() -> bool {
    true
}

fn default_photo_limit() -> usize {
    DEFAULT_PHOTO_LIMIT
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            dir: None,
            limit: default_photo_limit(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
