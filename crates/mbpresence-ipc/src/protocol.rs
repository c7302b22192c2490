//! Command and reply protocol
//!
//! Every command is a `WM_USER` message whose `wParam` is the opcode and
//! whose `lParam` is an optional integer argument. Text replies are packed
//! references into a named file mapping:
//!
//! ```text
//! reply (LRESULT)
//! ┌───────────────┬───────────────┐
//! │ offset: u16   │ segment: u16  │  <- bits 31..16 | bits 15..0
//! └───────────────┴───────────────┘
//!
//! record at `offset` in segment "mbipc_mmf_<segment>"
//! ┌──────────────────┐
//! │ capacity: i64    │  <- written by the server, never read
//! │ byte_count: i32  │  <- little-endian, length of the text in bytes
//! │ text...          │  <- UTF-16LE, may or may not be null-terminated
//! └──────────────────┘
//! ```

use crate::error::IpcError;

/// Size of the capacity field that precedes the length
pub const CAPACITY_FIELD_SIZE: usize = 8;

/// Size of the little-endian byte count
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Size of the record header (capacity + byte count)
pub const RECORD_HEADER_SIZE: usize = CAPACITY_FIELD_SIZE + LENGTH_FIELD_SIZE;

/// Probe reply meaning the IPC window is answering
pub const PROBE_OK: isize = 1;

/// Command opcodes (`wParam`)
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Current transport state (reply: [`PlayState`])
    GetPlayState = 109,
    /// A metadata field of the playing file (param: [`MetaDataType`], reply: text)
    GetFileTag = 142,
    /// Artwork embedded in or next to the file (reply: text)
    GetArtwork = 145,
    /// Artwork as a URL (reply: text)
    GetArtworkUrl = 146,
    /// Artwork cached by the downloader (reply: text)
    GetDownloadedArtwork = 147,
    /// Release the server allocation behind a text reply (param: the reply)
    FreeLResult = 900,
    /// Connectivity check (reply: 1)
    Probe = 999,
}

impl Command {
    /// Raw opcode sent as `wParam`
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Artwork commands in the order they are tried
///
/// Cached and embedded artwork come back as image data, the last entry
/// only as a URL.
pub const ARTWORK_FALLBACK: [Command; 3] = [
    Command::GetDownloadedArtwork,
    Command::GetArtwork,
    Command::GetArtworkUrl,
];

/// Transport state reported by [`Command::GetPlayState`]
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// Unknown, not connected, or an unrecognised reply
    #[default]
    Undefined = 0,
    /// A file is being opened
    Loading = 1,
    /// Playing
    Playing = 3,
    /// Paused
    Paused = 6,
    /// Stopped
    Stopped = 7,
}

impl PlayState {
    /// Map a raw reply to a state; the values are sparse so anything else is undefined
    pub fn from_reply(reply: isize) -> Self {
        match reply {
            1 => PlayState::Loading,
            3 => PlayState::Playing,
            6 => PlayState::Paused,
            7 => PlayState::Stopped,
            _ => PlayState::Undefined,
        }
    }
}

/// Metadata field selectors for [`Command::GetFileTag`]
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaDataType {
    /// Track title
    TrackTitle = 65,
    /// Album name
    Album = 30,
    /// Track artist
    Artist = 32,
}

impl MetaDataType {
    /// Raw selector sent as `lParam`
    pub fn param(self) -> isize {
        self as isize
    }
}

/// Location of a text record, unpacked from a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Numeric suffix of the segment name
    pub segment_id: u16,
    /// Byte offset of the record inside the segment
    pub offset: u16,
}

impl Reference {
    /// Unpack a non-zero reply; returns `None` for the "no data" reply
    pub fn from_reply(reply: isize) -> Option<Self> {
        if reply == 0 {
            return None;
        }
        let word = reply as usize;
        Some(Self {
            segment_id: (word & 0xFFFF) as u16,
            offset: ((word >> 16) & 0xFFFF) as u16,
        })
    }

    /// Pack back into a reply value
    pub fn to_reply(self) -> isize {
        (((self.offset as usize) << 16) | self.segment_id as usize) as isize
    }
}

/// Decode the text record at `offset` inside a mapped segment view
///
/// A zero byte count gives an empty string. The text stops at the first
/// null code unit if there is one. A negative count, or one that runs past
/// the end of `view`, is reported as [`IpcError::MalformedRecord`].
pub fn decode_record(view: &[u8], offset: usize) -> Result<String, IpcError> {
    let malformed = |declared: i64, available: usize| IpcError::MalformedRecord {
        offset,
        declared,
        available,
    };

    let length_start = offset
        .checked_add(CAPACITY_FIELD_SIZE)
        .ok_or_else(|| malformed(0, 0))?;
    let text_start = length_start + LENGTH_FIELD_SIZE;
    if text_start > view.len() {
        return Err(malformed(0, view.len().saturating_sub(offset)));
    }

    let byte_count = i32::from_le_bytes([
        view[length_start],
        view[length_start + 1],
        view[length_start + 2],
        view[length_start + 3],
    ]);
    let available = view.len() - text_start;

    if byte_count < 0 || byte_count as usize > available {
        return Err(malformed(byte_count as i64, available));
    }
    if byte_count == 0 {
        return Ok(String::new());
    }

    let text = &view[text_start..text_start + byte_count as usize];
    let units: Vec<u16> = text
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let len = units.iter().position(|&u| u == 0).unwrap_or(units.len());

    if len == 0 {
        return Ok(String::new());
    }
    Ok(String::from_utf16_lossy(&units[..len]))
}

/// Build a record the way the server lays it out
#[cfg(test)]
pub fn encode_record(text: &str, null_terminated: bool) -> Vec<u8> {
    let mut units: Vec<u16> = text.encode_utf16().collect();
    if null_terminated {
        units.push(0);
    }
    let byte_count = units.len() * 2;

    let mut bytes = Vec::with_capacity(RECORD_HEADER_SIZE + byte_count);
    bytes.extend_from_slice(&(byte_count as i64).to_le_bytes());
    bytes.extend_from_slice(&(byte_count as i32).to_le_bytes());
    for unit in units {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}
