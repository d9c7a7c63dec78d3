//! Usage analytics
//!
//! Events are fire-and-forget: the engine spawns the publish and never waits
//! for it, so a slow or failing sink has no effect on replies.

use async_nats::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wikimapia_types::ConversationId;

use crate::errors::BotError;
use crate::traits::Analytics;

/// A location was shared
pub const EVENT_LOCATION: &str = "location";
/// A place was picked from the list
pub const EVENT_PLACE: &str = "place";

/// A single tracked action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsEvent {
    pub name: String,
    pub chat_id: i64,
    pub user_id: Option<i64>,
    pub timestamp: i64,
}

impl AnalyticsEvent {
    pub fn new(name: &str, chat: ConversationId, user_id: Option<i64>) -> Self {
        Self {
            name: name.to_string(),
            chat_id: chat.0,
            user_id,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Subject an event is published on
pub fn subject(prefix: &str, event_name: &str) -> String {
    format!("wikimapia.{}.analytics.{}", prefix, event_name)
}

/// Publishes analytics events to NATS
#[derive(Clone)]
pub struct NatsAnalytics {
    client: Client,
    prefix: String,
}

impl NatsAnalytics {
    pub fn new(client: Client, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }
}

impl Analytics for NatsAnalytics {
    type Error = BotError;

    async fn track(&self, event: AnalyticsEvent) -> Result<(), BotError> {
        let subject = subject(&self.prefix, &event.name);
        let payload = serde_json::to_vec(&event)?;
        self.client
            .publish(subject.clone(), payload.into())
            .await
            .map_err(|e| BotError::Publish(e.to_string()))?;
        debug!("Published analytics event to {}", subject);
        Ok(())
    }
}

/// Track `event` on a detached task.
pub fn spawn_track<A: Analytics>(analytics: &A, event: AnalyticsEvent) {
    let analytics = analytics.clone();
    tokio::spawn(async move {
        let name = event.name.clone();
        if let Err(e) = analytics.track(event).await {
            debug!("Failed to track analytics event '{}': {}", name, e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockAnalytics;

    #[test]
    fn test_subject() {
        assert_eq!(subject("prod", EVENT_LOCATION), "wikimapia.prod.analytics.location");
        assert_eq!(subject("dev", EVENT_PLACE), "wikimapia.dev.analytics.place");
    }

    #[test]
    fn test_event_payload_fields() {
        let event = AnalyticsEvent::new(EVENT_PLACE, ConversationId(42), Some(7));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["name"], "place");
        assert_eq!(json["chat_id"], 42);
        assert_eq!(json["user_id"], 7);
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_disabled_sink_drops_events() {
        let sink: Option<MockAnalytics> = None;
        let event = AnalyticsEvent::new(EVENT_LOCATION, ConversationId(1), None);
        assert!(sink.track(event).await.is_ok());
    }

    #[tokio::test]
    async fn test_enabled_sink_forwards_events() {
        let mock = MockAnalytics::new();
        let sink = Some(mock.clone());
        sink.track(AnalyticsEvent::new(EVENT_LOCATION, ConversationId(1), None))
            .await
            .unwrap();
        assert_eq!(mock.event_names(), vec!["location".to_string()]);
    }

    #[tokio::test]
    async fn test_spawn_track_delivers_in_background() {
        let mock = MockAnalytics::new();
        spawn_track(&mock, AnalyticsEvent::new(EVENT_PLACE, ConversationId(3), Some(9)));

        for _ in 0..100 {
            if mock.event_count() > 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(mock.event_names(), vec!["place".to_string()]);
    }
}
