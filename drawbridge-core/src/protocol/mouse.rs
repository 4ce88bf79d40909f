//! Mouse state as carried by `Rrdmouse` and `Tbouncemouse`.

use super::geometry::Point;

/// Pointer position, pressed buttons and event timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mouse {
    pub xy: Point,
    /// Button bitmask (bit 0 = left, 1 = middle, 2 = right, 3/4 = wheel).
    pub buttons: u32,
    /// Milliseconds timestamp of the event.
    pub msec: u32,
}

impl Mouse {
    pub fn new(xy: Point, buttons: u32, msec: u32) -> Self {
        Self { xy, buttons, msec }
    }
}

/// A mouse event handed back by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseEvent {
    pub mouse: Mouse,
    /// Set when the window was resized since the previous event.
    pub resized: bool,
}
