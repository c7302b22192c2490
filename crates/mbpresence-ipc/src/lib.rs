//! Client for the MusicBee IPC protocol
//!
//! MusicBee's IPC plugin exposes a hidden window that answers `WM_USER`
//! messages. Scalar replies come back as the message result; text replies
//! come back as a packed reference into a named file mapping.
//!
//! # Architecture
//!
//! - [`segment`] - Opens and decodes the shared memory record behind a reply
//! - [`CommandChannel`] - Sends commands to the IPC window and frees replies
//! - [`Session`] - Connection lifecycle and the playback status query
//!
//! # Reply Protocol
//!
//! Commands and reply layouts are defined in [`protocol`]:
//! - [`Command`] - Message opcode (`wParam`)
//! - [`Reference`] - Segment id and offset packed into a reply
//! - [`PlayState`] / [`MetaDataType`] - Enumerations used by the queries

#![deny(missing_docs)]

pub mod caption;
pub mod channel;
pub mod config;
pub mod error;
pub mod protocol;
pub mod segment;
pub mod session;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use caption::{CaptionOrder, CaptionTrack, find_track, parse_caption};
pub use channel::CommandChannel;
pub use config::IpcConfig;
pub use error::IpcError;
pub use protocol::*;
pub use segment::SegmentSource;
pub use session::{Session, TrackStatus};
pub use window::{WindowHandle, WindowSystem};

#[cfg(windows)]
pub use segment::NamedSegments;
#[cfg(windows)]
pub use window::{Win32Windows, top_level_captions};

/// Title of the window the IPC plugin registers
pub const IPC_WINDOW_TITLE: &str = "MusicBee IPC Interface";

/// Shared memory name format - the segment id is appended in decimal
pub const SEGMENT_NAME_PREFIX: &str = "mbipc_mmf_";

/// Window message every command is sent with (`WM_USER`)
pub const IPC_MESSAGE: u32 = 0x0400;
