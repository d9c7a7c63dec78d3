//! Text formatting for place lists and place details

use teloxide::utils::html;
use wikimapia_types::{emoji, Place, PlaceDetail};

/// Longest description shown, in characters
pub const DESCRIPTION_LIMIT: usize = 1024;

/// Appended to a description that was cut
pub const TRUNCATION_MARKER: &str = "...";

const HOUSE: &str = "\u{1f3e0}";

/// One "`<emoji> <title>`" line per place, separated by blank lines.
///
/// Only places with an emoji ordinal are rendered, so every line corresponds
/// to a keyboard button. An empty list renders as an empty string.
pub fn render_list(places: &[Place]) -> String {
    places
        .iter()
        .enumerate()
        .filter_map(|(index, place)| {
            emoji::encode(index + 1).map(|token| format!("{} {}", token, place.title))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// HTML block with the bold title, the description and the reference link.
pub fn render_detail(detail: &PlaceDetail) -> String {
    format!(
        "{} <b>{}</b>\n\n{}\n\n{}",
        HOUSE,
        html::escape(&detail.title),
        html::escape(&truncate_description(&detail.description)),
        detail.url_html
    )
}

/// Cut `text` to [`DESCRIPTION_LIMIT`] characters, marking the cut.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((byte_index, _)) => format!("{}{}", &text[..byte_index], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_list() {
        assert_eq!(render_list(&[]), "");
    }

    #[test]
    fn test_render_two_places() {
        let text = render_list(&[Place::new(1, "Kremlin"), Place::new(2, "GUM")]);
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["1️⃣ Kremlin", "2️⃣ GUM"]);
        assert_eq!(text, "1️⃣ Kremlin\n\n2️⃣ GUM");
    }

    #[test]
    fn test_render_list_stops_at_last_ordinal() {
        let places: Vec<Place> = (1..=11).map(|i| Place::new(i, format!("P{}", i))).collect();
        let text = render_list(&places);
        assert_eq!(text.lines().filter(|l| !l.is_empty()).count(), 9);
        assert!(text.ends_with("9️⃣ P9"));
    }

    #[test]
    fn test_short_description_is_verbatim() {
        let text = "a".repeat(DESCRIPTION_LIMIT);
        assert_eq!(truncate_description(&text), text);
    }

    #[test]
    fn test_long_description_is_cut_with_marker() {
        let text = "a".repeat(DESCRIPTION_LIMIT + 1);
        let cut = truncate_description(&text);
        assert_eq!(cut, format!("{}...", "a".repeat(DESCRIPTION_LIMIT)));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "ж".repeat(DESCRIPTION_LIMIT + 10);
        let cut = truncate_description(&text);
        let body = cut.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(body.chars().count(), DESCRIPTION_LIMIT);

        let exact = "ж".repeat(DESCRIPTION_LIMIT);
        assert_eq!(truncate_description(&exact), exact);
    }

    #[test]
    fn test_render_detail() {
        let detail = PlaceDetail {
            title: "Red Square".to_string(),
            description: "Main square".to_string(),
            url_html: "<a href=\"http://wikimapia.org/55/\">Red Square</a>".to_string(),
            photos: vec![],
        };
        assert_eq!(
            render_detail(&detail),
            "🏠 <b>Red Square</b>\n\nMain square\n\n<a href=\"http://wikimapia.org/55/\">Red Square</a>"
        );
    }

    #[test]
    fn test_render_detail_escapes_text_but_not_link() {
        let detail = PlaceDetail {
            title: "A & B <C>".to_string(),
            description: "x < y".to_string(),
            url_html: "<a href=\"u\">l</a>".to_string(),
            photos: vec![],
        };
        let text = render_detail(&detail);
        assert!(text.contains("<b>A &amp; B &lt;C&gt;</b>"));
        assert!(text.contains("x &lt; y"));
        assert!(text.ends_with("<a href=\"u\">l</a>"));
    }

    #[test]
    fn test_render_detail_tolerates_empty_fields() {
        let text = render_detail(&PlaceDetail::default());
        assert_eq!(text, "🏠 <b></b>\n\n\n\n");
    }

    #[test]
    fn test_render_detail_truncates_long_description() {
        let detail = PlaceDetail {
            description: "b".repeat(2000),
            ..Default::default()
        };
        let text = render_detail(&detail);
        assert!(text.contains(&format!("{}...", "b".repeat(DESCRIPTION_LIMIT))));
        assert!(!text.contains(&"b".repeat(DESCRIPTION_LIMIT + 1)));
    }
}
