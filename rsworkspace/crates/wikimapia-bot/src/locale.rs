//! Locale store: persisted language choice per conversation
//!
//! Reads never fail from the caller's point of view. A missing record, a
//! storage error and an unrecognised stored value all resolve to the default
//! locale.

use bytes::Bytes;
use tracing::{debug, warn};
use wikimapia_types::{ConversationId, Locale};

use crate::traits::KeyValue;

/// Locale store
#[derive(Clone)]
pub struct LocaleStore<K> {
    kv: K,
}

impl<K: KeyValue> LocaleStore<K> {
    /// Create a locale store over the given key-value backend
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Language of the conversation, defaulting to English.
    pub async fn get(&self, chat: ConversationId) -> Locale {
        match self.kv.get(chat.storage_key()).await {
            Ok(Some(value)) => {
                let code = std::str::from_utf8(&value).ok();
                match code.and_then(Locale::from_code) {
                    Some(locale) => locale,
                    None => {
                        warn!("Ignoring unrecognised locale stored for chat {}", chat);
                        Locale::default()
                    }
                }
            }
            Ok(None) => Locale::default(),
            Err(e) => {
                warn!("Failed to read locale for chat {}: {}", chat, e);
                Locale::default()
            }
        }
    }

    /// Overwrite the conversation's language.
    pub async fn set(&self, chat: ConversationId, locale: Locale) -> Result<(), K::Error> {
        self.kv
            .put(chat.storage_key(), Bytes::from_static(locale.code().as_bytes()))
            .await?;
        debug!("Set locale for chat {} to {}", chat, locale);
        Ok(())
    }
}
