//! Structured payload types carried inside [`Message`] bodies.
//!
//! [`Message`]: crate::packet::Message

pub mod cursor;
pub mod geometry;
pub mod mouse;

pub use cursor::{CURSOR_PLANE_LEN, CURSOR_SIZE, Cursor};
pub use geometry::{Point, Rect, WindowGeometry, parse_winsize};
pub use mouse::{Mouse, MouseEvent};
