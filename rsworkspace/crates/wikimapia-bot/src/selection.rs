//! Selection resolver: turns an emoji button press back into a list entry

use wikimapia_types::{emoji, ConversationId, Place};

use crate::session::SessionStore;

/// Classification of an inbound selection attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The ordinal names an entry of the current list
    Resolved { ordinal: usize, place: Place },
    /// The text is not an emoji selection token
    NotASelection,
    /// A selection token arrived but no list was ever shown to the conversation
    NoActiveSession,
    /// The ordinal is outside the current list
    OutOfRange { ordinal: usize, available: usize },
}

/// Resolve `text` against the conversation's current session.
pub async fn resolve(sessions: &SessionStore, chat: ConversationId, text: &str) -> Resolution {
    let Some(ordinal) = emoji::decode(text) else {
        return Resolution::NotASelection;
    };

    match sessions.get(chat).await {
        Some(places) => select(&places, ordinal),
        None => Resolution::NoActiveSession,
    }
}

/// Pick the entry for a 1-based `ordinal`. Valid iff `1 <= ordinal <= places.len()`.
pub fn select(places: &[Place], ordinal: usize) -> Resolution {
    match ordinal.checked_sub(1).and_then(|index| places.get(index)) {
        Some(place) => Resolution::Resolved {
            ordinal,
            place: place.clone(),
        },
        None => Resolution::OutOfRange {
            ordinal,
            available: places.len(),
        },
    }
}
