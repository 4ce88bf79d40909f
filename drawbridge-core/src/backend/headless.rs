//! In-memory display backend.
//!
//! Keeps the state a real windowing system would hold (window geometry,
//! title, pointer, cursor, clipboard, pending input) so the bridge can
//! run without a display and tests can observe every call.

use std::collections::VecDeque;

use tracing::debug;

use super::{BackendResult, CursorImage, DisplayBackend, WindowHandle};
use crate::error::BackendError;
use crate::protocol::{Mouse, MouseEvent, Point};

/// Snapshot of the single headless window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub handle: WindowHandle,
    pub title: String,
    pub origin: Option<Point>,
    pub width: i32,
    pub height: i32,
    /// Number of `raise` calls.
    pub raised: u32,
}

/// Backend that records state in memory.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    window: Option<HeadlessWindow>,
    next_handle: u32,
    pointer: Point,
    cursor: Option<CursorImage>,
    clipboard: Option<String>,
    mouse_events: VecDeque<MouseEvent>,
    keys: VecDeque<u16>,
    last_error: String,
    /// When set, `create_window` fails with this message.
    refuse_windows: Option<String>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `create_window` fail with `reason`.
    pub fn refuse_windows(&mut self, reason: impl Into<String>) {
        self.refuse_windows = Some(reason.into());
    }

    /// Queue a mouse event for `read_mouse`.
    pub fn push_mouse(&mut self, event: MouseEvent) {
        self.mouse_events.push_back(event);
    }

    /// Queue a keyboard rune for `read_key`.
    pub fn push_key(&mut self, rune: u16) {
        self.keys.push_back(rune);
    }

    pub fn window(&self) -> Option<&HeadlessWindow> {
        self.window.as_ref()
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Installed cursor; `None` means the default arrow.
    pub fn cursor(&self) -> Option<&CursorImage> {
        self.cursor.as_ref()
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    fn fail<T>(&mut self, message: impl Into<String>) -> BackendResult<T> {
        let err = BackendError::new(message);
        self.last_error = err.0.clone();
        Err(err)
    }

    fn window_mut(&mut self, handle: WindowHandle) -> BackendResult<&mut HeadlessWindow> {
        if !self.window.as_ref().is_some_and(|w| w.handle == handle) {
            return self.fail(format!("invalid window handle {}", handle.0));
        }
        self.window
            .as_mut()
            .ok_or_else(|| BackendError::new("no window"))
    }
}

impl DisplayBackend for HeadlessBackend {
    fn create_window(
        &mut self,
        title: &str,
        origin: Option<Point>,
        width: i32,
        height: i32,
    ) -> BackendResult<WindowHandle> {
        if let Some(reason) = self.refuse_windows.clone() {
            return self.fail(reason);
        }
        if width <= 0 || height <= 0 {
            return self.fail(format!("invalid window size {width}x{height}"));
        }
        self.next_handle += 1;
        let handle = WindowHandle(self.next_handle);
        debug!(?handle, title, ?origin, width, height, "headless window created");
        self.window = Some(HeadlessWindow {
            handle,
            title: title.to_string(),
            origin,
            width,
            height,
            raised: 0,
        });
        Ok(handle)
    }

    fn resize(&mut self, window: WindowHandle, width: i32, height: i32) -> BackendResult<()> {
        if width <= 0 || height <= 0 {
            return self.fail(format!("invalid window size {width}x{height}"));
        }
        let w = self.window_mut(window)?;
        w.width = width;
        w.height = height;
        Ok(())
    }

    fn raise(&mut self, window: WindowHandle) -> BackendResult<()> {
        self.window_mut(window)?.raised += 1;
        Ok(())
    }

    fn set_title(&mut self, window: WindowHandle, title: &str) -> BackendResult<()> {
        self.window_mut(window)?.title = title.to_string();
        Ok(())
    }

    fn set_cursor(&mut self, image: Option<&CursorImage>) -> BackendResult<()> {
        // The previous image is dropped here.
        self.cursor = image.cloned();
        Ok(())
    }

    fn warp_pointer(&mut self, window: WindowHandle, xy: Point) -> BackendResult<()> {
        self.window_mut(window)?;
        self.pointer = xy;
        Ok(())
    }

    fn get_clipboard_text(&mut self) -> BackendResult<String> {
        match self.clipboard.clone() {
            Some(text) => Ok(text),
            None => self.fail("clipboard is empty"),
        }
    }

    fn set_clipboard_text(&mut self, text: &str) -> BackendResult<()> {
        self.clipboard = Some(text.to_string());
        Ok(())
    }

    fn read_mouse(&mut self) -> BackendResult<MouseEvent> {
        match self.mouse_events.pop_front() {
            Some(event) => {
                self.pointer = event.mouse.xy;
                Ok(event)
            }
            None => self.fail("no pending mouse event"),
        }
    }

    fn bounce_mouse(&mut self, mouse: Mouse) -> BackendResult<()> {
        self.mouse_events.push_back(MouseEvent {
            mouse,
            resized: false,
        });
        Ok(())
    }

    fn read_key(&mut self) -> BackendResult<u16> {
        match self.keys.pop_front() {
            Some(rune) => Ok(rune),
            None => self.fail("no pending keyboard event"),
        }
    }

    fn last_error(&self) -> String {
        self.last_error.clone()
    }
}
