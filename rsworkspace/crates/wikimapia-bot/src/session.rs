//! Session store: the most recently rendered list of places per conversation
//!
//! Held in process memory only. A restart loses every session, which is fine
//! because the next location share repopulates it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use wikimapia_types::{ConversationId, Place};

/// Places of one rendered list, in ordinal order
pub type SessionEntry = Arc<[Place]>;

/// Session store
#[derive(Clone, Default)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<ConversationId, SessionEntry>>>,
}

impl SessionStore {
    /// Create an empty session store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the conversation's list with `places`.
    pub async fn put(&self, chat: ConversationId, places: Vec<Place>) {
        let count = places.len();
        let mut entries = self.entries.write().await;
        entries.insert(chat, places.into());
        debug!("Stored session for chat {} with {} places", chat, count);
    }

    /// The conversation's current list, if it has one.
    pub async fn get(&self, chat: ConversationId) -> Option<SessionEntry> {
        let entries = self.entries.read().await;
        entries.get(&chat).cloned()
    }

    /// Number of conversations with a stored list
    pub async fn active_sessions(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn places(titles: &[&str]) -> Vec<Place> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| Place::new(i as u64 + 1, *t))
            .collect()
    }

    #[tokio::test]
    async fn test_get_unknown_conversation() {
        let store = SessionStore::new();
        assert!(store.get(ConversationId(1)).await.is_none());
        assert_eq!(store.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn test_put_then_get_preserves_order() {
        let store = SessionStore::new();
        store.put(ConversationId(1), places(&["A", "B", "C"])).await;

        let entry = store.get(ConversationId(1)).await.unwrap();
        let titles: Vec<&str> = entry.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_put_replaces_without_merging() {
        let store = SessionStore::new();
        store.put(ConversationId(1), places(&["A", "B", "C"])).await;
        store.put(ConversationId(1), places(&["X"])).await;

        let entry = store.get(ConversationId(1)).await.unwrap();
        assert_eq!(entry.len(), 1);
        assert_eq!(entry[0].title, "X");
        assert_eq!(store.active_sessions().await, 1);
    }

    #[tokio::test]
    async fn test_empty_list_is_still_a_session() {
        let store = SessionStore::new();
        store.put(ConversationId(1), Vec::new()).await;
        let entry = store.get(ConversationId(1)).await.unwrap();
        assert!(entry.is_empty());
    }

    #[tokio::test]
    async fn test_conversations_are_isolated() {
        let store = SessionStore::new();
        store.put(ConversationId(1), places(&["A"])).await;
        store.put(ConversationId(2), places(&["B", "C"])).await;

        assert_eq!(store.get(ConversationId(1)).await.unwrap().len(), 1);
        assert_eq!(store.get(ConversationId(2)).await.unwrap().len(), 2);
        assert_eq!(store.active_sessions().await, 2);
    }

    #[tokio::test]
    async fn test_reader_keeps_snapshot_after_replace() {
        let store = SessionStore::new();
        store.put(ConversationId(1), places(&["A", "B"])).await;
        let before = store.get(ConversationId(1)).await.unwrap();

        store.put(ConversationId(1), places(&["Z"])).await;

        assert_eq!(before.len(), 2);
        assert_eq!(store.get(ConversationId(1)).await.unwrap()[0].title, "Z");
    }

    #[tokio::test]
    async fn test_concurrent_writers_on_distinct_conversations() {
        let store = SessionStore::new();
        let mut handles = Vec::new();
        for id in 0..16i64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.put(ConversationId(id), places(&["P"])).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.active_sessions().await, 16);
    }
}
