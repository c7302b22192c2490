//! In-memory stand-ins for the window manager and shared memory

use crate::error::IpcError;
use crate::protocol::{Command, Reference, decode_record, encode_record};
use crate::segment::{SegmentSource, segment_name};
use crate::window::{WindowHandle, WindowSystem};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub const FAKE_WINDOW: WindowHandle = WindowHandle(0x1234);

/// Scripted IPC window shared between the test and the channel under test
#[derive(Default)]
pub struct FakeState {
    /// Title the fake window answers to, `None` when no window exists
    pub title: RefCell<Option<String>>,
    pub alive: Cell<bool>,
    pub replies: RefCell<HashMap<(Command, isize), isize>>,
    pub sent: RefCell<Vec<(Command, isize)>>,
    pub lookups: Cell<usize>,
}

#[derive(Clone, Default)]
pub struct FakeWindows(pub Rc<FakeState>);

impl FakeWindows {
    /// No IPC window at all
    pub fn absent() -> Self {
        Self::default()
    }

    /// A live IPC window that answers the probe
    pub fn running(title: &str) -> Self {
        let fake = Self::default();
        *fake.0.title.borrow_mut() = Some(title.to_string());
        fake.0.alive.set(true);
        fake.reply(Command::Probe, 0, 1);
        fake
    }

    pub fn reply(&self, command: Command, param: isize, reply: isize) {
        self.0.replies.borrow_mut().insert((command, param), reply);
    }

    /// Simulate the server exiting
    pub fn destroy(&self) {
        self.0.alive.set(false);
    }

    pub fn sent(&self) -> Vec<(Command, isize)> {
        self.0.sent.borrow().clone()
    }

    pub fn count(&self, command: Command) -> usize {
        self.0.sent.borrow().iter().filter(|(c, _)| *c == command).count()
    }

    pub fn frees(&self) -> Vec<isize> {
        self.0
            .sent
            .borrow()
            .iter()
            .filter(|(c, _)| *c == Command::FreeLResult)
            .map(|(_, p)| *p)
            .collect()
    }

    pub fn lookups(&self) -> usize {
        self.0.lookups.get()
    }
}

impl WindowSystem for FakeWindows {
    fn find_window(&self, title: &str) -> Option<WindowHandle> {
        self.0.lookups.set(self.0.lookups.get() + 1);
        let known = self.0.title.borrow();
        match known.as_deref() {
            Some(t) if t == title && self.0.alive.get() => Some(FAKE_WINDOW),
            _ => None,
        }
    }

    fn is_window(&self, window: WindowHandle) -> bool {
        window == FAKE_WINDOW && self.0.alive.get()
    }

    fn send_message(&self, window: WindowHandle, command: Command, param: isize) -> isize {
        if !self.is_window(window) {
            return 0;
        }
        self.0.sent.borrow_mut().push((command, param));
        self.0
            .replies
            .borrow()
            .get(&(command, param))
            .copied()
            .unwrap_or(0)
    }
}

/// Shared memory segments kept as byte buffers
#[derive(Clone, Default)]
pub struct FakeSegments {
    segments: Rc<RefCell<HashMap<u16, Vec<u8>>>>,
    reads: Rc<Cell<usize>>,
}

impl FakeSegments {
    /// Place `text` as a record at `offset` in segment `segment_id`, return the packed reply
    pub fn put(&self, segment_id: u16, offset: u16, text: &str) -> isize {
        self.put_raw(segment_id, offset, &encode_record(text, true))
    }

    /// Place raw record bytes at `offset`, return the packed reply
    pub fn put_raw(&self, segment_id: u16, offset: u16, record: &[u8]) -> isize {
        let mut segments = self.segments.borrow_mut();
        let segment = segments.entry(segment_id).or_default();
        let end = offset as usize + record.len();
        if segment.len() < end {
            segment.resize(end, 0);
        }
        segment[offset as usize..end].copy_from_slice(record);
        Reference { segment_id, offset }.to_reply()
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl SegmentSource for FakeSegments {
    fn read_string(&self, reference: Reference) -> Result<String, IpcError> {
        self.reads.set(self.reads.get() + 1);
        let segments = self.segments.borrow();
        let segment =
            segments
                .get(&reference.segment_id)
                .ok_or_else(|| IpcError::SegmentNotFound {
                    name: segment_name("fake_", reference.segment_id),
                })?;
        decode_record(segment, reference.offset as usize)
    }
}
