//! Rich presence derived from the playback status

use colored::Colorize;
use mbpresence_ipc::TrackStatus;

/// Label shown while nothing is playing
pub const IDLE_LABEL: &str = "waiting for song...";

/// The fields a rich presence service displays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presence {
    /// First line
    pub details: String,
    /// Second line
    pub state: String,
    /// Asset key of the large image
    pub large_image_key: String,
    /// Tooltip of the large image
    pub large_image_text: String,
}

impl Presence {
    /// Presence for `status`, or `idle` when there is no playing track with a title
    pub fn from_status(status: &TrackStatus, idle: &Presence) -> Self {
        if !status.is_playing || status.title.is_empty() {
            return idle.clone();
        }
        Self {
            details: format!("♪ {}", status.title),
            state: format!("by {}", status.artist),
            large_image_key: "music".to_string(),
            large_image_text: "Listening to music".to_string(),
        }
    }
}

/// Human readable "now playing" line
pub fn now_playing_label(status: &TrackStatus) -> String {
    if status.is_playing && !status.title.is_empty() {
        format!("🎧 {} - {}", status.title, status.artist)
    } else {
        IDLE_LABEL.to_string()
    }
}

/// Destination for presence updates
pub trait PresenceSink {
    /// Replace the published presence
    fn publish(&mut self, presence: &Presence);
}

/// Prints presence updates to stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl PresenceSink for ConsoleSink {
    fn publish(&mut self, presence: &Presence) {
        println!(
            "{} {} | {} [{}: {}]",
            "[PRESENCE]".magenta(),
            presence.details,
            presence.state,
            presence.large_image_key,
            presence.large_image_text
        );
    }
}

/// Publishes only when the derived presence changes between polls
pub struct PresencePublisher<S> {
    sink: S,
    idle: Presence,
    last: Option<Presence>,
}

impl<S: PresenceSink> PresencePublisher<S> {
    /// Publisher falling back to `idle` when nothing plays
    pub fn new(sink: S, idle: Presence) -> Self {
        Self {
            sink,
            idle,
            last: None,
        }
    }

    /// Derive the presence for `status`; returns true if it was published
    pub fn update(&mut self, status: &TrackStatus) -> bool {
        let presence = Presence::from_status(status, &self.idle);
        if self.last.as_ref() == Some(&presence) {
            return false;
        }
        self.sink.publish(&presence);
        self.last = Some(presence);
        true
    }

    /// The sink updates are written to
    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}
