//! Emoji index codec
//!
//! Maps the 1-based position of a place in a rendered list to the keycap
//! emoji shown in front of it. The same token is the text of the keyboard
//! button, so an inbound message equal to a token is a selection.

/// Highest ordinal the codec can represent
pub const MAX_ORDINAL: usize = 9;

const KEYCAPS: [&str; MAX_ORDINAL] = [
    "1\u{fe0f}\u{20e3}",
    "2\u{fe0f}\u{20e3}",
    "3\u{fe0f}\u{20e3}",
    "4\u{fe0f}\u{20e3}",
    "5\u{fe0f}\u{20e3}",
    "6\u{fe0f}\u{20e3}",
    "7\u{fe0f}\u{20e3}",
    "8\u{fe0f}\u{20e3}",
    "9\u{fe0f}\u{20e3}",
];

/// Token for `ordinal`, or `None` outside `1..=MAX_ORDINAL`.
pub fn encode(ordinal: usize) -> Option<&'static str> {
    ordinal
        .checked_sub(1)
        .and_then(|index| KEYCAPS.get(index))
        .copied()
}

/// Ordinal for `token`, or `None` if it is not one of the keycaps.
pub fn decode(token: &str) -> Option<usize> {
    KEYCAPS
        .iter()
        .position(|keycap| *keycap == token)
        .map(|index| index + 1)
}
