//! Telegram transport: updates in, replies out

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ButtonRequest, InputFile, KeyboardMarkup, Message, ParseMode, ReplyMarkup};
use teloxide::RequestError;
use tracing::{debug, error, warn};
use wikimapia_client::WikimapiaClient;
use wikimapia_types::{ConversationId, ReplyKeyboard};

use crate::analytics::NatsAnalytics;
use crate::engine::{Engine, Event, Reply, TextFormat};
use crate::errors::{classify, SendOutcome};
use crate::health::AppState;
use crate::nats_impls::NatsKv;

/// Engine wired to the production collaborators
pub type BotEngine = Engine<WikimapiaClient, reqwest::Client, Option<NatsAnalytics>, NatsKv>;

/// Handle location shares
pub async fn handle_location_message(
    bot: Bot,
    msg: Message,
    engine: Arc<BotEngine>,
    health: AppState,
) -> ResponseResult<()> {
    let Some(location) = msg.location() else {
        return Ok(());
    };

    let event = Event::Location {
        chat: ConversationId(msg.chat.id.0),
        user_id: msg.from.as_ref().map(|u| u.id.0 as i64),
        username: msg.from.as_ref().and_then(|u| u.username.clone()),
        latitude: location.latitude,
        longitude: location.longitude,
    };

    let replies = engine.handle_guarded(event).await;
    deliver(&bot, msg.chat.id, replies, &health).await;
    Ok(())
}

/// Handle text messages: selections, language switching and everything else
pub async fn handle_text_message(
    bot: Bot,
    msg: Message,
    engine: Arc<BotEngine>,
    health: AppState,
) -> ResponseResult<()> {
    let text = msg.text().unwrap_or_default();
    debug!("Received text message in chat {}: {}", msg.chat.id, text);

    let event = Event::Text {
        chat: ConversationId(msg.chat.id.0),
        user_id: msg.from.as_ref().map(|u| u.id.0 as i64),
        username: msg.from.as_ref().and_then(|u| u.username.clone()),
        text: text.to_string(),
    };

    let replies = engine.handle_guarded(event).await;
    deliver(&bot, msg.chat.id, replies, &health).await;
    Ok(())
}

/// Send replies in order. A chat that can no longer be reached stops the batch.
async fn deliver(bot: &Bot, chat_id: ChatId, replies: Vec<Reply>, health: &AppState) {
    for reply in replies {
        match send_with_retry(bot, chat_id, &reply).await {
            Ok(()) => {
                if matches!(reply, Reply::Photo(_)) {
                    health.increment_photos_sent().await;
                }
            }
            Err(SendOutcome::Permanent(reason)) => {
                warn!("Dropping remaining replies for chat {}: {}", chat_id, reason);
                health.increment_errors().await;
                return;
            }
            Err(outcome) => {
                error!("Failed to send reply to chat {}: {:?}", chat_id, outcome);
                health.increment_errors().await;
            }
        }
        // Photo files are removed here, once the upload is done.
    }
}

/// Send one reply, honouring a single flood-control wait.
async fn send_with_retry(bot: &Bot, chat_id: ChatId, reply: &Reply) -> Result<(), SendOutcome> {
    let err = match send(bot, chat_id, reply).await {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    match classify(chat_id.0, &err) {
        SendOutcome::Retry(wait) => {
            tokio::time::sleep(wait).await;
            send(bot, chat_id, reply)
                .await
                .map_err(|e| classify(chat_id.0, &e))
        }
        outcome => Err(outcome),
    }
}

async fn send(bot: &Bot, chat_id: ChatId, reply: &Reply) -> Result<(), RequestError> {
    match reply {
        Reply::Text {
            text,
            format,
            keyboard,
        } => {
            let mut req = bot.send_message(chat_id, text.clone());
            if *format == TextFormat::Html {
                req.parse_mode = Some(ParseMode::Html);
            }
            if let Some(keyboard) = keyboard {
                req.reply_markup = Some(ReplyMarkup::Keyboard(to_markup(keyboard)));
            }
            req.await?;
        }
        Reply::Photo(photo) => {
            bot.send_photo(chat_id, InputFile::file(photo.path())).await?;
        }
    }
    Ok(())
}

/// Convert a keyboard model into Telegram reply keyboard markup
pub fn to_markup(keyboard: &ReplyKeyboard) -> KeyboardMarkup {
    let rows: Vec<Vec<teloxide::types::KeyboardButton>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| {
                    let converted = teloxide::types::KeyboardButton::new(button.text.clone());
                    if button.request_location {
                        converted.request(ButtonRequest::Location)
                    } else {
                        converted
                    }
                })
                .collect()
        })
        .collect();

    let markup = KeyboardMarkup::new(rows);
    if keyboard.resize {
        markup.resize_keyboard()
    } else {
        markup
    }
}
