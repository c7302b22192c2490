//! Session client
//!
//! The entry point a poller calls on a fixed interval. A session reconnects
//! on its own whenever the IPC window is gone; "MusicBee is not running" is
//! an ordinary result, not an error.

use crate::channel::CommandChannel;
use crate::config::IpcConfig;
use crate::protocol::{MetaDataType, PlayState};
use crate::segment::SegmentSource;
use crate::window::WindowSystem;

/// Snapshot of what MusicBee is playing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackStatus {
    /// True only for [`PlayState::Playing`]
    pub is_playing: bool,
    /// Raw transport state
    pub state: PlayState,
    /// Track title
    pub title: String,
    /// Track artist
    pub artist: String,
    /// Album name
    pub album: String,
    /// Artwork as returned by the server (image data or a URL)
    pub artwork: String,
}

/// Connection lifecycle plus the status query
pub struct Session<W, S> {
    channel: CommandChannel<W, S>,
}

#[cfg(windows)]
impl Session<crate::window::Win32Windows, crate::segment::NamedSegments> {
    /// Session against the real window manager and file mappings
    pub fn win32(config: IpcConfig) -> Self {
        let segments = crate::segment::NamedSegments::new(config.segment_prefix.clone());
        Self::new(crate::window::Win32Windows, segments, config)
    }
}

impl<W: WindowSystem, S: SegmentSource> Session<W, S> {
    /// Create a disconnected session
    pub fn new(windows: W, segments: S, config: IpcConfig) -> Self {
        Self {
            channel: CommandChannel::new(windows, segments, config),
        }
    }

    /// Connect to the IPC window
    pub fn connect(&mut self) -> bool {
        self.channel.connect()
    }

    /// Drop the connection
    pub fn disconnect(&mut self) {
        self.channel.disconnect();
    }

    /// True while the IPC window exists
    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    /// Query the playback state and, while playing, the track metadata and artwork
    ///
    /// Connects first if needed. When MusicBee is absent or not playing the
    /// metadata queries are skipped and the text fields are empty.
    pub fn fetch_status(&mut self) -> TrackStatus {
        if !self.channel.refresh_connection() && !self.channel.connect() {
            return TrackStatus::default();
        }

        let state = self.channel.get_play_state();
        let mut status = TrackStatus {
            is_playing: state == PlayState::Playing,
            state,
            ..TrackStatus::default()
        };

        if !status.is_playing {
            return status;
        }

        status.title = self.channel.get_file_tag(MetaDataType::TrackTitle);
        status.artist = self.channel.get_file_tag(MetaDataType::Artist);
        status.album = self.channel.get_file_tag(MetaDataType::Album);
        status.artwork = self.channel.get_artwork();
        status
    }
}
