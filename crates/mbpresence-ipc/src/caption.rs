//! Now-playing from a window caption
//!
//! Without the IPC plugin the player still shows the track in its main
//! window title, e.g. `Artist - Title - MusicBee`. Some skins swap the order
//! to `Title - Artist - MusicBee`, and either field may itself contain a
//! dash, so the split is a heuristic:
//!
//! 1. Strip the trailing ` - <app>`
//! 2. Artist first: split at the first ` - `, accepted when both halves are
//!    non-empty and the title half has no further separator
//! 3. Otherwise title first: split at the last ` - `

/// Separator between caption fields
pub const CAPTION_SEPARATOR: &str = " - ";

/// Field order the caption was parsed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionOrder {
    /// `Artist - Title - App`
    ArtistFirst,
    /// `Title - Artist - App`
    TitleFirst,
}

/// Track fields recovered from a caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// Track artist
    pub artist: String,
    /// Track title
    pub title: String,
    /// Ordering that matched
    pub order: CaptionOrder,
}

/// Parse `caption` as a now-playing title of the application `app_name`
pub fn parse_caption(caption: &str, app_name: &str) -> Option<CaptionTrack> {
    let suffix = format!("{}{}", CAPTION_SEPARATOR, app_name);
    let body = caption.trim().strip_suffix(&suffix)?.trim();

    if let Some((artist, title)) = body.split_once(CAPTION_SEPARATOR) {
        let (artist, title) = (artist.trim(), title.trim());
        if !artist.is_empty() && !title.is_empty() && !title.contains(CAPTION_SEPARATOR) {
            return Some(CaptionTrack {
                artist: artist.to_string(),
                title: title.to_string(),
                order: CaptionOrder::ArtistFirst,
            });
        }
    }

    let (title, artist) = body.rsplit_once(CAPTION_SEPARATOR)?;
    let (title, artist) = (title.trim(), artist.trim());
    if title.is_empty() || artist.is_empty() {
        return None;
    }
    Some(CaptionTrack {
        artist: artist.to_string(),
        title: title.to_string(),
        order: CaptionOrder::TitleFirst,
    })
}

/// First caption among `captions` that parses as a track of `app_name`
pub fn find_track<I, T>(captions: I, app_name: &str) -> Option<CaptionTrack>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    captions
        .into_iter()
        .find_map(|caption| parse_caption(caption.as_ref(), app_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_first() {
        let track = parse_caption("Band - Song - MusicBee", "MusicBee").unwrap();
        assert_eq!(track.artist, "Band");
        assert_eq!(track.title, "Song");
        assert_eq!(track.order, CaptionOrder::ArtistFirst);
    }

    #[test]
    fn test_title_with_dash_falls_back_to_title_first() {
        let track = parse_caption("Song - Live - Band - MusicBee", "MusicBee").unwrap();
        assert_eq!(track.title, "Song - Live");
        assert_eq!(track.artist, "Band");
        assert_eq!(track.order, CaptionOrder::TitleFirst);
    }

    #[test]
    fn test_requires_app_suffix() {
        assert!(parse_caption("Band - Song", "MusicBee").is_none());
        assert!(parse_caption("Band - Song - Notepad", "MusicBee").is_none());
    }

    #[test]
    fn test_idle_caption() {
        assert!(parse_caption("MusicBee", "MusicBee").is_none());
        assert!(parse_caption("Song - MusicBee", "MusicBee").is_none());
    }

    #[test]
    fn test_hyphen_without_spaces_is_not_a_separator() {
        let track = parse_caption("Jay-Z - Song - MusicBee", "MusicBee").unwrap();
        assert_eq!(track.artist, "Jay-Z");
        assert_eq!(track.title, "Song");
    }

    #[test]
    fn test_find_track_skips_other_windows() {
        let captions = ["Inbox - Mail", "MusicBee", "Band - Song - MusicBee"];
        let track = find_track(captions, "MusicBee").unwrap();
        assert_eq!(track.title, "Song");
        assert!(find_track(["Inbox - Mail"], "MusicBee").is_none());
    }
}
