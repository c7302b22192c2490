//! Artwork payload handling
//!
//! The artwork commands return either base64 image data or a plain URL.
//! Short strings and strings without a `/` are never image data.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Shortest artwork text that is considered image data
pub const MIN_IMAGE_TEXT_LEN: usize = 150;

/// What an artwork string turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artwork {
    /// No artwork
    None,
    /// Decoded image bytes
    Image(Vec<u8>),
    /// Anything else, usually a URL
    Text(String),
}

impl Artwork {
    /// Classify the artwork text from a status poll
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Artwork::None;
        }
        match decode_image(text) {
            Some(bytes) => Artwork::Image(bytes),
            None => Artwork::Text(text.to_string()),
        }
    }
}

/// Heuristic check for base64 image data, ignoring surrounding whitespace
pub fn looks_like_image_data(text: &str) -> bool {
    let text = text.trim();
    text.len() > MIN_IMAGE_TEXT_LEN && text.contains('/')
}

/// Decode base64 image data, `None` if the text is not image data
pub fn decode_image(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    if !looks_like_image_data(text) {
        return None;
    }
    STANDARD
        .decode(text)
        .ok()
        .filter(|bytes| !bytes.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_artwork() {
        assert_eq!(Artwork::from_text(""), Artwork::None);
    }

    #[test]
    fn test_decodes_base64_image() {
        // 0xFF bytes encode to '/' characters
        let bytes = vec![0xFFu8; 150];
        let text = STANDARD.encode(&bytes);
        assert!(looks_like_image_data(&text));
        assert_eq!(Artwork::from_text(&text), Artwork::Image(bytes));
    }

    #[test]
    fn test_short_text_is_not_image() {
        let text = STANDARD.encode([0xFFu8; 30]);
        assert!(!looks_like_image_data(&text));
        assert!(decode_image(&text).is_none());
    }

    #[test]
    fn test_padding_does_not_count_towards_length() {
        // 108 bytes encode to 144 characters, under the threshold once trimmed
        let text = format!("{}{}\n", " ".repeat(20), STANDARD.encode([0xFFu8; 108]));
        assert!(text.len() > MIN_IMAGE_TEXT_LEN);
        assert!(!looks_like_image_data(&text));
        assert_eq!(Artwork::from_text(&text), Artwork::Text(text.clone()));
    }

    #[test]
    fn test_trimmed_image_data_decodes() {
        let bytes = vec![0xFFu8; 150];
        let text = format!("  {}\r\n", STANDARD.encode(&bytes));
        assert_eq!(decode_image(&text), Some(bytes));
    }

    #[test]
    fn test_long_text_without_slash_is_not_image() {
        let text = "A".repeat(400);
        assert!(!looks_like_image_data(&text));
        assert_eq!(Artwork::from_text(&text), Artwork::Text(text.clone()));
    }

    #[test]
    fn test_url_stays_text() {
        let url = format!("https://example.com/{}/cover.jpg", "a".repeat(200));
        assert!(looks_like_image_data(&url));
        assert_eq!(Artwork::from_text(&url), Artwork::Text(url.clone()));
    }
}
