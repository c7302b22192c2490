//! Window lookup and message dispatch
//!
//! The IPC window is located by its exact title and addressed with
//! synchronous `SendMessageW` calls. [`WindowSystem`] abstracts the three
//! calls the client needs so the protocol can run against a fake.

use crate::protocol::Command;

/// Opaque handle to a window owned by another process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

/// The windowing calls the command channel depends on
pub trait WindowSystem {
    /// Find a top-level window whose title equals `title` exactly
    fn find_window(&self, title: &str) -> Option<WindowHandle>;

    /// Check that `window` still exists
    fn is_window(&self, window: WindowHandle) -> bool;

    /// Send `command` with `param` and block until the window procedure returns
    fn send_message(&self, window: WindowHandle, command: Command, param: isize) -> isize;
}

#[cfg(windows)]
pub use win32::{Win32Windows, top_level_captions};

#[cfg(windows)]
mod win32 {
    use super::{WindowHandle, WindowSystem};
    use crate::IPC_MESSAGE;
    use crate::protocol::Command;
    use std::ffi::c_void;
    use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, FindWindowW, GetWindowTextLengthW, GetWindowTextW, IsWindow,
        IsWindowVisible, SendMessageW,
    };
    use windows::core::{BOOL, PCWSTR};

    fn to_hwnd(window: WindowHandle) -> HWND {
        HWND(window.0 as *mut c_void)
    }

    /// The real Win32 window manager
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Win32Windows;

    impl WindowSystem for Win32Windows {
        fn find_window(&self, title: &str) -> Option<WindowHandle> {
            let title_wide: Vec<u16> = title.encode_utf16().chain(std::iter::once(0)).collect();
            let hwnd = unsafe { FindWindowW(PCWSTR::null(), PCWSTR(title_wide.as_ptr())) }.ok()?;
            if hwnd.is_invalid() {
                return None;
            }
            Some(WindowHandle(hwnd.0 as isize))
        }

        fn is_window(&self, window: WindowHandle) -> bool {
            unsafe { IsWindow(Some(to_hwnd(window))).as_bool() }
        }

        fn send_message(&self, window: WindowHandle, command: Command, param: isize) -> isize {
            let result = unsafe {
                SendMessageW(
                    to_hwnd(window),
                    IPC_MESSAGE,
                    Some(WPARAM(command.code() as usize)),
                    Some(LPARAM(param)),
                )
            };
            result.0
        }
    }

    /// Titles of all visible top-level windows with a non-empty caption
    pub fn top_level_captions() -> Vec<String> {
        let mut captions: Vec<String> = Vec::new();
        unsafe {
            let _ = EnumWindows(
                Some(collect_caption),
                LPARAM(&mut captions as *mut Vec<String> as isize),
            );
        }
        captions
    }

    unsafe extern "system" fn collect_caption(hwnd: HWND, lparam: LPARAM) -> BOOL {
        unsafe {
            let captions = &mut *(lparam.0 as *mut Vec<String>);

            if !IsWindowVisible(hwnd).as_bool() {
                return BOOL(1);
            }

            let len = GetWindowTextLengthW(hwnd);
            if len <= 0 {
                return BOOL(1);
            }

            let mut buffer = vec![0u16; len as usize + 1];
            let copied = GetWindowTextW(hwnd, &mut buffer);
            if copied > 0 {
                captions.push(String::from_utf16_lossy(&buffer[..copied as usize]));
            }
        }
        BOOL(1)
    }
}
