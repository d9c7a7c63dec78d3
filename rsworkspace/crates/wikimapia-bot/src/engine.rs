//! Inbound event handling
//!
//! The engine turns one transport-independent [`Event`] into the replies that
//! should be sent back to the same conversation. It owns the session and
//! locale stores and talks to the outside world only through the collaborator
//! traits, so the whole flow runs against mocks in tests.

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, error, info, warn};
use wikimapia_types::{emoji, ConversationId, Locale, Place, ReplyKeyboard};

use crate::analytics::{spawn_track, AnalyticsEvent, EVENT_LOCATION, EVENT_PLACE};
use crate::errors::BotError;
use crate::health::AppState;
use crate::i18n::{Catalog, MessageKey};
use crate::locale::LocaleStore;
use crate::photos::{LocalPhoto, PhotoPipeline};
use crate::render::{render_detail, render_list};
use crate::selection::{self, Resolution};
use crate::session::SessionStore;
use crate::traits::{Analytics, KeyValue, PhotoSource, PlaceLookup};

/// Tracing target for shared locations
pub const LOCATIONS_TARGET: &str = "wikimapia_bot::locations";

/// Inbound event, already stripped of transport details
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Location {
        chat: ConversationId,
        user_id: Option<i64>,
        username: Option<String>,
        latitude: f64,
        longitude: f64,
    },
    Text {
        chat: ConversationId,
        user_id: Option<i64>,
        username: Option<String>,
        text: String,
    },
}

impl Event {
    pub fn chat(&self) -> ConversationId {
        match self {
            Event::Location { chat, .. } | Event::Text { chat, .. } => *chat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

/// Outbound reply, in send order
#[derive(Debug)]
pub enum Reply {
    Text {
        text: String,
        format: TextFormat,
        keyboard: Option<ReplyKeyboard>,
    },
    Photo(LocalPhoto),
}

impl Reply {
    fn plain(text: String, keyboard: Option<ReplyKeyboard>) -> Self {
        Reply::Text {
            text,
            format: TextFormat::Plain,
            keyboard,
        }
    }
}

/// Event engine
pub struct Engine<L, S, A, K> {
    lookup: L,
    photos: PhotoPipeline<S>,
    analytics: A,
    sessions: SessionStore,
    locales: LocaleStore<K>,
    catalog: Catalog,
    health: AppState,
}

impl<L, S, A, K> Engine<L, S, A, K>
where
    L: PlaceLookup,
    S: PhotoSource,
    A: Analytics,
    K: KeyValue,
{
    pub fn new(
        lookup: L,
        photos: PhotoPipeline<S>,
        analytics: A,
        locale_kv: K,
        catalog: Catalog,
        health: AppState,
    ) -> Self {
        Self {
            lookup,
            photos,
            analytics,
            sessions: SessionStore::new(),
            locales: LocaleStore::new(locale_kv),
            catalog,
            health,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn locales(&self) -> &LocaleStore<K> {
        &self.locales
    }

    /// Handle one event, isolating any failure or panic to that event.
    ///
    /// Failures are logged and counted; the conversation gets no reply.
    pub async fn handle_guarded(&self, event: Event) -> Vec<Reply> {
        let chat = event.chat();
        self.health.increment_updates_received().await;

        match AssertUnwindSafe(self.handle(event)).catch_unwind().await {
            Ok(Ok(replies)) => replies,
            Ok(Err(e)) => {
                error!("Failed to handle event for chat {}: {}", chat, e);
                self.health.increment_errors().await;
                Vec::new()
            }
            Err(panic) => {
                let e = BotError::Panicked(panic_message(panic.as_ref()));
                error!("Failed to handle event for chat {}: {}", chat, e);
                self.health.increment_errors().await;
                Vec::new()
            }
        }
    }

    /// Handle one event.
    pub async fn handle(&self, event: Event) -> Result<Vec<Reply>, BotError> {
        match event {
            Event::Location {
                chat,
                user_id,
                username,
                latitude,
                longitude,
            } => {
                info!(
                    target: LOCATIONS_TARGET,
                    chat_id = chat.0,
                    user_id = ?user_id,
                    username = ?username,
                    latitude,
                    longitude,
                    "Location shared"
                );
                self.on_location(chat, user_id, latitude, longitude).await
            }
            Event::Text {
                chat, user_id, text, ..
            } => self.on_text(chat, user_id, &text).await,
        }
    }

    async fn on_location(
        &self,
        chat: ConversationId,
        user_id: Option<i64>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Reply>, BotError> {
        self.health.increment_locations().await;
        let locale = self.locales.get(chat).await;

        let mut places: Vec<Place> = match self.lookup.nearby(latitude, longitude, locale).await {
            Ok(places) => places,
            Err(e) => {
                warn!("Nearby lookup failed for chat {}: {}", chat, e);
                return Ok(vec![self.prompt(MessageKey::SomethingWentWrong, locale)]);
            }
        };
        places.truncate(emoji::MAX_ORDINAL);

        let count = places.len();
        let text = render_list(&places);
        self.sessions.put(chat, places).await;
        self.health
            .set_active_sessions(self.sessions.active_sessions().await)
            .await;
        spawn_track(&self.analytics, AnalyticsEvent::new(EVENT_LOCATION, chat, user_id));

        if count == 0 {
            return Ok(vec![self.prompt(MessageKey::NoPlacesFound, locale)]);
        }

        let share_label = self.translate(MessageKey::ShareLocation, locale);
        let keyboard = ReplyKeyboard::places(share_label, count);
        Ok(vec![Reply::plain(text, Some(keyboard))])
    }

    async fn on_text(
        &self,
        chat: ConversationId,
        user_id: Option<i64>,
        text: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let mut locale = self.locales.get(chat).await;

        match selection::resolve(&self.sessions, chat, text).await {
            Resolution::Resolved { ordinal, place } => {
                debug!("Chat {} selected ordinal {} ({})", chat, ordinal, place.id);
                return Ok(self.on_selection(chat, user_id, place, locale).await);
            }
            Resolution::NoActiveSession => {
                debug!("Chat {} sent a selection without a place list", chat);
                return Ok(vec![Reply::plain(
                    self.translate(MessageKey::SomethingWentWrong, locale),
                    None,
                )]);
            }
            Resolution::OutOfRange { ordinal, available } => {
                debug!(
                    "Chat {} selected ordinal {} but only {} places are listed",
                    chat, ordinal, available
                );
                return Ok(vec![Reply::plain(
                    self.translate(MessageKey::SomethingWentWrong, locale),
                    None,
                )]);
            }
            Resolution::NotASelection => {}
        }

        if text.starts_with("/lang") {
            return Ok(vec![Reply::plain(
                self.translate(MessageKey::ChooseLanguage, locale),
                Some(ReplyKeyboard::languages()),
            )]);
        }

        if let Some(chosen) = Locale::from_flag(text) {
            match self.locales.set(chat, chosen).await {
                Ok(()) => {
                    info!("Chat {} switched language to {}", chat, chosen);
                    locale = chosen;
                }
                Err(e) => {
                    warn!("Failed to store locale {} for chat {}: {}", chosen, chat, e);
                    self.health.increment_errors().await;
                }
            }
        }

        Ok(vec![self.prompt(MessageKey::ShareYourLocation, locale)])
    }

    async fn on_selection(
        &self,
        chat: ConversationId,
        user_id: Option<i64>,
        place: Place,
        locale: Locale,
    ) -> Vec<Reply> {
        self.health.increment_selections().await;
        spawn_track(&self.analytics, AnalyticsEvent::new(EVENT_PLACE, chat, user_id));

        let detail = match self.lookup.detail(place.id, locale).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!("Detail lookup for place {} failed: {}", place.id, e);
                return vec![Reply::plain(self.translate(MessageKey::CantLoadPlace, locale), None)];
            }
        };

        let mut replies = vec![Reply::Text {
            text: render_detail(&detail),
            format: TextFormat::Html,
            keyboard: None,
        }];
        replies.extend(
            self.photos
                .fetch_up_to(&detail.photos)
                .await
                .into_iter()
                .map(Reply::Photo),
        );
        replies
    }

    /// Translated text with a keyboard holding only the share-location button
    fn prompt(&self, key: MessageKey, locale: Locale) -> Reply {
        let keyboard = ReplyKeyboard::places(self.translate(MessageKey::ShareLocation, locale), 0);
        Reply::plain(self.translate(key, locale), Some(keyboard))
    }

    fn translate(&self, key: MessageKey, locale: Locale) -> String {
        self.catalog.translate(key, locale)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
