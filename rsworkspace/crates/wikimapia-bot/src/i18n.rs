//! Translated user-facing strings
//!
//! The English text of each message is also its lookup key. Translations are
//! JSON objects mapping that key to the localized text, one file per locale.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use wikimapia_types::Locale;

const EMBEDDED_RU: &str = include_str!("../i18n/ru.json");

/// Closed set of messages the bot can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    NoPlacesFound,
    ChooseLanguage,
    ShareLocation,
    SomethingWentWrong,
    CantLoadPlace,
    ShareYourLocation,
}

impl MessageKey {
    pub const ALL: [MessageKey; 6] = [
        MessageKey::NoPlacesFound,
        MessageKey::ChooseLanguage,
        MessageKey::ShareLocation,
        MessageKey::SomethingWentWrong,
        MessageKey::CantLoadPlace,
        MessageKey::ShareYourLocation,
    ];

    /// English text, used as the translation key
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::NoPlacesFound => "No places found",
            MessageKey::ChooseLanguage => "Choose language",
            MessageKey::ShareLocation => "Share location",
            MessageKey::SomethingWentWrong => "Something went wrong",
            MessageKey::CantLoadPlace => "Can't load place information",
            MessageKey::ShareYourLocation => "Please share your location",
        }
    }
}

/// Translation catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    translations: HashMap<Locale, HashMap<String, String>>,
}

impl Catalog {
    /// Catalog compiled into the binary
    pub fn embedded() -> Result<Self> {
        let mut catalog = Self::default();
        catalog.insert_json(Locale::Ru, EMBEDDED_RU)?;
        Ok(catalog)
    }

    /// Embedded catalog, overridden by `<dir>/<code>.json` files that exist.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut catalog = Self::embedded()?;
        let Some(dir) = dir else {
            return Ok(catalog);
        };

        for locale in Locale::ALL {
            if locale == Locale::En {
                continue;
            }
            let path = dir.join(format!("{}.json", locale.code()));
            if !path.exists() {
                debug!("No translation file at {}", path.display());
                continue;
            }
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read translation file: {}", path.display()))?;
            catalog
                .insert_json(locale, &content)
                .with_context(|| format!("Failed to parse translation file: {}", path.display()))?;
            debug!("Loaded translations for {} from {}", locale, path.display());
        }

        Ok(catalog)
    }

    fn insert_json(&mut self, locale: Locale, json: &str) -> Result<()> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        self.translations.insert(locale, entries);
        Ok(())
    }

    /// Text of `key` in `locale`, falling back to English.
    pub fn translate(&self, key: MessageKey, locale: Locale) -> String {
        if locale == Locale::En {
            return key.as_str().to_string();
        }

        match self
            .translations
            .get(&locale)
            .and_then(|entries| entries.get(key.as_str()))
        {
            Some(text) => text.clone(),
            None => {
                warn!("Missing {} translation for '{}'", locale, key.as_str());
                key.as_str().to_string()
            }
        }
    }
}
