//! Command channel to the IPC window
//!
//! Owns the window handle and turns raw replies into values. Text replies
//! are decoded through a [`SegmentSource`] and then released on the server
//! with [`Command::FreeLResult`]. Every failure on the server side degrades
//! to an empty or undefined value; nothing here is fatal.

use crate::config::IpcConfig;
use crate::error::IpcError;
use crate::protocol::{ARTWORK_FALLBACK, Command, MetaDataType, PROBE_OK, PlayState, Reference};
use crate::segment::SegmentSource;
use crate::window::{WindowHandle, WindowSystem};

/// Synchronous request/response channel to the IPC window
pub struct CommandChannel<W, S> {
    windows: W,
    segments: S,
    config: IpcConfig,
    window: Option<WindowHandle>,
}

impl<W: WindowSystem, S: SegmentSource> CommandChannel<W, S> {
    /// Create a disconnected channel
    pub fn new(windows: W, segments: S, config: IpcConfig) -> Self {
        Self {
            windows,
            segments,
            config,
            window: None,
        }
    }

    /// Locate the IPC window and check that it answers the probe
    ///
    /// The handle is only kept when the probe succeeds.
    pub fn connect(&mut self) -> bool {
        match self.try_connect() {
            Ok(window) => {
                tracing::debug!(window = window.0, "connected to IPC window");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "connect failed");
                false
            }
        }
    }

    fn try_connect(&mut self) -> Result<WindowHandle, IpcError> {
        // A stale handle value may already belong to another window
        self.window = None;
        let window = self
            .windows
            .find_window(&self.config.window_title)
            .ok_or_else(|| IpcError::WindowNotFound {
                title: self.config.window_title.clone(),
            })?;

        self.window = Some(window);
        if !self.probe() {
            self.window = None;
            return Err(IpcError::NotConnected);
        }
        Ok(window)
    }

    /// Forget the window handle
    pub fn disconnect(&mut self) {
        if self.window.take().is_some() {
            tracing::debug!("disconnected from IPC window");
        }
    }

    /// True if a handle is held and the window still exists (checked on every call)
    pub fn is_connected(&self) -> bool {
        self.window.is_some_and(|w| self.windows.is_window(w))
    }

    /// Like [`is_connected`](Self::is_connected), but forgets the handle once the window is gone
    pub fn refresh_connection(&mut self) -> bool {
        if self.is_connected() {
            return true;
        }
        if self.window.take().is_some() {
            tracing::debug!("IPC window is gone, handle released");
        }
        false
    }

    /// Send a command and return the raw reply
    pub fn send(&self, command: Command, param: isize) -> Result<isize, IpcError> {
        let window = self
            .window
            .filter(|&w| self.windows.is_window(w))
            .ok_or(IpcError::NotConnected)?;
        Ok(self.windows.send_message(window, command, param))
    }

    /// True if the window answers the probe
    pub fn probe(&self) -> bool {
        matches!(self.send(Command::Probe, 0), Ok(PROBE_OK))
    }

    /// Current transport state, [`PlayState::Undefined`] when not connected
    pub fn get_play_state(&self) -> PlayState {
        match self.send(Command::GetPlayState, 0) {
            Ok(reply) => PlayState::from_reply(reply),
            Err(_) => PlayState::Undefined,
        }
    }

    /// A metadata field of the playing file, empty when absent
    pub fn get_file_tag(&self, kind: MetaDataType) -> String {
        match self.send(Command::GetFileTag, kind.param()) {
            Ok(reply) => self.take_string(reply),
            Err(_) => String::new(),
        }
    }

    /// Artwork text from the first artwork command that returns something
    pub fn get_artwork(&self) -> String {
        if !self.is_connected() {
            return String::new();
        }
        for command in ARTWORK_FALLBACK {
            let text = match self.send(command, 0) {
                Ok(reply) => self.take_string(reply),
                Err(_) => return String::new(),
            };
            if !text.is_empty() {
                return text;
            }
            tracing::trace!(?command, "no artwork, trying next source");
        }
        String::new()
    }

    /// Release the server allocation behind a text reply
    ///
    /// Must be called exactly once for every non-zero reply that was read.
    pub fn free_reply(&self, reply: isize) {
        if reply == 0 {
            return;
        }
        if let Err(e) = self.send(Command::FreeLResult, reply) {
            tracing::debug!(reply, error = %e, "reply not freed");
        }
    }

    /// Decode a text reply and free it; the only place replies are read
    fn take_string(&self, reply: isize) -> String {
        let Some(reference) = Reference::from_reply(reply) else {
            return String::new();
        };

        let text = self
            .segments
            .read_string(reference)
            .unwrap_or_else(|e| {
                tracing::debug!(?reference, error = %e, "reply could not be decoded");
                String::new()
            });

        self.free_reply(reply);
        text
    }
}
