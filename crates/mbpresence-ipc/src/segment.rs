//! Shared memory decoding
//!
//! Text replies live in file mappings created by the server. Each decode
//! opens the mapping read-only, maps the whole thing, reads one record and
//! releases both the view and the handle before returning. No view outlives
//! the call that opened it.

use crate::error::IpcError;
use crate::protocol::Reference;

/// Something that can resolve a [`Reference`] to the text it points at
pub trait SegmentSource {
    /// Read the text record behind `reference`
    fn read_string(&self, reference: Reference) -> Result<String, IpcError>;
}

/// Name of the file mapping holding `segment_id`
pub fn segment_name(prefix: &str, segment_id: u16) -> String {
    format!("{}{}", prefix, segment_id)
}

#[cfg(windows)]
pub use win32::{NamedSegments, SegmentView};

#[cfg(windows)]
mod win32 {
    use super::{SegmentSource, segment_name};
    use crate::error::IpcError;
    use crate::protocol::{Reference, decode_record};
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::System::Memory::{
        FILE_MAP_READ, MEMORY_BASIC_INFORMATION, MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile,
        OpenFileMappingW, UnmapViewOfFile, VirtualQuery,
    };
    use windows::core::PCWSTR;

    /// Read-only view of a named file mapping, unmapped and closed on drop
    pub struct SegmentView {
        name: String,
        handle: HANDLE,
        view: MEMORY_MAPPED_VIEW_ADDRESS,
        len: usize,
    }

    impl SegmentView {
        /// Open and map an existing segment for reading
        pub fn open(name: &str) -> Result<Self, IpcError> {
            let name_wide: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();

            unsafe {
                let handle = OpenFileMappingW(FILE_MAP_READ.0, false, PCWSTR(name_wide.as_ptr()))
                    .map_err(|_| IpcError::SegmentNotFound {
                        name: name.to_string(),
                    })?;

                let view = MapViewOfFile(handle, FILE_MAP_READ, 0, 0, 0);
                if view.Value.is_null() {
                    if let Err(e) = CloseHandle(handle) {
                        tracing::warn!(segment = %name, error = %e, "failed to close segment handle");
                    }
                    return Err(IpcError::MapFailed {
                        name: name.to_string(),
                    });
                }

                // From here on Drop releases the view and the handle
                let mut segment = Self {
                    name: name.to_string(),
                    handle,
                    view,
                    len: 0,
                };

                // The mapping size is not part of the record, ask the VM for the view size
                let mut info = MEMORY_BASIC_INFORMATION::default();
                let written = VirtualQuery(
                    Some(view.Value as *const _),
                    &mut info,
                    std::mem::size_of::<MEMORY_BASIC_INFORMATION>(),
                );
                if written == 0 {
                    return Err(IpcError::MapFailed {
                        name: name.to_string(),
                    });
                }
                segment.len = info.RegionSize;

                Ok(segment)
            }
        }

        /// Mapped bytes
        pub fn as_bytes(&self) -> &[u8] {
            unsafe { std::slice::from_raw_parts(self.view.Value as *const u8, self.len) }
        }
    }

    impl Drop for SegmentView {
        fn drop(&mut self) {
            unsafe {
                if let Err(e) = UnmapViewOfFile(self.view) {
                    tracing::warn!(segment = %self.name, error = %e, "failed to unmap segment view");
                }
                if let Err(e) = CloseHandle(self.handle) {
                    tracing::warn!(segment = %self.name, error = %e, "failed to close segment handle");
                }
            }
        }
    }

    /// Segments opened by name from the global file mapping namespace
    #[derive(Debug, Clone)]
    pub struct NamedSegments {
        prefix: String,
    }

    impl NamedSegments {
        /// Resolve segment ids against `prefix`
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
            }
        }
    }

    impl SegmentSource for NamedSegments {
        fn read_string(&self, reference: Reference) -> Result<String, IpcError> {
            let name = segment_name(&self.prefix, reference.segment_id);
            let view = SegmentView::open(&name)?;
            decode_record(view.as_bytes(), reference.offset as usize)
        }
    }
}
