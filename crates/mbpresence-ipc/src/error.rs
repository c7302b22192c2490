//! Error type for IPC operations

use thiserror::Error;

/// Errors raised inside the client
///
/// None of these are fatal: the query methods on
/// [`CommandChannel`](crate::CommandChannel) turn every variant into an
/// empty or undefined result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IpcError {
    /// No window handle is held, or the window no longer exists
    #[error("Not connected to the IPC window")]
    NotConnected,

    /// No window with the expected title exists
    #[error("IPC window not found: {title}")]
    WindowNotFound {
        /// Title that was searched for
        title: String,
    },

    /// The named file mapping could not be opened
    #[error("Shared memory segment not found: {name}")]
    SegmentNotFound {
        /// Name of the mapping
        name: String,
    },

    /// The file mapping exists but could not be mapped into this process
    #[error("Failed to map shared memory segment: {name}")]
    MapFailed {
        /// Name of the mapping
        name: String,
    },

    /// The record's declared length does not fit inside the mapped view
    #[error(
        "Malformed record at offset {offset}: declared {declared} bytes, {available} available"
    )]
    MalformedRecord {
        /// Offset of the record inside the view
        offset: usize,
        /// Byte count read from the record header
        declared: i64,
        /// Bytes left in the view after the record header
        available: usize,
    },
}
