//! Per-connection session state.
//!
//! Holds the single window created by `Tinit` and the cursor currently
//! installed. Owned by the server loop and lent to handlers.

use crate::backend::WindowHandle;
use crate::error::DrawError;
use crate::protocol::Cursor;

/// Cursor currently shown over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorState {
    /// The backend's default arrow.
    #[default]
    Default,
    /// A client-supplied bitmap.
    Custom(Cursor),
}

/// Mutable record of the open window and its cursor.
#[derive(Debug, Default)]
pub struct Session {
    window: Option<WindowHandle>,
    cursor: CursorState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The open window, if `init` succeeded.
    pub fn window(&self) -> Option<WindowHandle> {
        self.window
    }

    /// The open window, or [`DrawError::NoWindow`].
    pub fn require_window(&self) -> Result<WindowHandle, DrawError> {
        self.window.ok_or(DrawError::NoWindow)
    }

    /// Record a successfully created window.
    ///
    /// A second `init` replaces the handle; the protocol has no close.
    pub fn attach_window(&mut self, handle: WindowHandle) {
        self.window = Some(handle);
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn set_cursor(&mut self, cursor: CursorState) {
        self.cursor = cursor;
    }
}
