//! Error types for wikimapia-bot
//!
//! `BotError` covers failures of the engine and its stores. Telegram send
//! failures are classified separately so the transport can decide whether a
//! reply is worth retrying.

use std::time::Duration;

use teloxide::RequestError;
use thiserror::Error;
use tracing::{debug, warn};

/// Error types for engine operations
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("KV error: {0}")]
    Kv(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Event handler panicked: {0}")]
    Panicked(String),
}

/// Result of a failed Telegram request
#[derive(Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Flood control; retry after this duration
    Retry(Duration),
    /// The chat can no longer be reached; do not retry
    Permanent(String),
    /// Anything else; log and move on
    Transient(String),
}

/// Classify a `RequestError` raised while delivering a reply.
pub fn classify(chat_id: i64, err: &RequestError) -> SendOutcome {
    match err {
        // ── Flood control ────────────────────────────────────────────────────
        RequestError::RetryAfter(secs) => {
            let wait = Duration::from_secs(secs.duration().as_secs().max(1));
            warn!("Flood control for chat {}: retry after {:?}", chat_id, wait);
            SendOutcome::Retry(wait)
        }

        // ── Chat migration ───────────────────────────────────────────────────
        RequestError::MigrateToChatId(new_id) => {
            let msg = format!("Chat migrated to {}", new_id.0);
            warn!("Chat {}: {}", chat_id, msg);
            SendOutcome::Permanent(msg)
        }

        // ── Telegram API errors ──────────────────────────────────────────────
        RequestError::Api(api_err) => classify_api(chat_id, api_err),

        // ── Network / I/O / invalid JSON ─────────────────────────────────────
        _ => {
            debug!("Transient send error for chat {}: {}", chat_id, err);
            SendOutcome::Transient(err.to_string())
        }
    }
}

fn classify_api(chat_id: i64, api_err: &teloxide::ApiError) -> SendOutcome {
    use teloxide::ApiError;

    let permanent = match api_err {
        ApiError::BotBlocked => Some("Bot was blocked by the user"),
        ApiError::BotKicked => Some("Bot was kicked from the group"),
        ApiError::BotKickedFromSupergroup => Some("Bot was kicked from the supergroup"),
        ApiError::BotKickedFromChannel => Some("Bot was kicked from the channel"),
        ApiError::ChatNotFound => Some("Chat not found"),
        ApiError::UserDeactivated => Some("User is deactivated"),
        ApiError::GroupDeactivated => Some("Group is deactivated"),
        ApiError::CantInitiateConversation => Some("Can't initiate conversation with the user"),
        _ => None,
    };

    match permanent {
        Some(reason) => {
            warn!("Permanent Telegram error for chat {}: {}", chat_id, reason);
            SendOutcome::Permanent(reason.to_string())
        }
        None => {
            debug!("Transient Telegram error for chat {}: {}", chat_id, api_err);
            SendOutcome::Transient(api_err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::ChatId;
    use teloxide::ApiError;

    #[test]
    fn test_blocked_is_permanent() {
        let err = RequestError::Api(ApiError::BotBlocked);
        assert!(matches!(classify(1, &err), SendOutcome::Permanent(_)));
    }

    #[test]
    fn test_migration_is_permanent() {
        let err = RequestError::MigrateToChatId(ChatId(-100500));
        match classify(1, &err) {
            SendOutcome::Permanent(msg) => assert!(msg.contains("-100500")),
            other => panic!("expected permanent, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_api_error_is_transient() {
        let err = RequestError::Api(ApiError::MessageIsTooLong);
        assert!(matches!(classify(1, &err), SendOutcome::Transient(_)));
    }

    #[test]
    fn test_bot_error_display() {
        assert_eq!(BotError::Kv("down".into()).to_string(), "KV error: down");
        assert_eq!(
            BotError::Panicked("boom".into()).to_string(),
            "Event handler panicked: boom"
        );
    }
}
