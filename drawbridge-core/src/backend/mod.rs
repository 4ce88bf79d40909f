//! Display backend and draw-data channel seams.
//!
//! The protocol layer never talks to a windowing system directly: every
//! window, cursor, clipboard and input call goes through
//! [`DisplayBackend`], and raw draw bytes go through [`DrawChannel`].
//!
//! | Module     | Purpose                                            |
//! |----------- |----------------------------------------------------|
//! | `cursor`   | Convert wire cursors into backend pixel images     |
//! | `headless` | In-memory backend for tests and windowless runs    |
//! | `draw`     | Stream and loopback draw-data channels             |

pub mod cursor;
pub mod draw;
pub mod headless;

use crate::error::BackendError;
use crate::protocol::{Mouse, MouseEvent, Point};

pub use cursor::{CursorImage, CursorPixel};
pub use draw::{DrawChannel, LoopbackDrawChannel, StreamDrawChannel};
pub use headless::HeadlessBackend;

/// Opaque identifier of a backend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u32);

/// Result alias for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

// ── DisplayBackend ───────────────────────────────────────────────

/// Capability set the handlers need from a windowing system.
pub trait DisplayBackend {
    /// Create the window. `origin` is `None` for "let the backend place it".
    fn create_window(
        &mut self,
        title: &str,
        origin: Option<Point>,
        width: i32,
        height: i32,
    ) -> BackendResult<WindowHandle>;

    fn resize(&mut self, window: WindowHandle, width: i32, height: i32) -> BackendResult<()>;

    fn raise(&mut self, window: WindowHandle) -> BackendResult<()>;

    fn set_title(&mut self, window: WindowHandle, title: &str) -> BackendResult<()>;

    /// Install `image`, or the default arrow for `None`.
    ///
    /// Replaces the previous cursor, which the backend releases.
    fn set_cursor(&mut self, image: Option<&CursorImage>) -> BackendResult<()>;

    fn warp_pointer(&mut self, window: WindowHandle, xy: Point) -> BackendResult<()>;

    /// Current clipboard text, handed over as an owned copy.
    fn get_clipboard_text(&mut self) -> BackendResult<String>;

    fn set_clipboard_text(&mut self, text: &str) -> BackendResult<()>;

    /// Next mouse event from the backend's event source.
    fn read_mouse(&mut self) -> BackendResult<MouseEvent>;

    /// Feed a mouse event back into the event source.
    fn bounce_mouse(&mut self, mouse: Mouse) -> BackendResult<()>;

    /// Next keyboard rune.
    fn read_key(&mut self) -> BackendResult<u16>;

    /// Description of the most recent failure.
    fn last_error(&self) -> String;
}
