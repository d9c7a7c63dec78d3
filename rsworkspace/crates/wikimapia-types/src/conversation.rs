//! Conversation identifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one chat.
///
/// Stable for the lifetime of the conversation and used as the key into both
/// the session store and the locale store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ConversationId(pub i64);

impl ConversationId {
    /// Key under which per-conversation records are persisted
    pub fn storage_key(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ConversationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
