//! 16×16 two-plane cursor bitmaps.
//!
//! Each plane holds 16 rows of 2 bytes, most significant bit leftmost.
//! A pixel is painted from the `set` plane first; `clr` marks pixels
//! that are drawn in the background colour.

use super::geometry::Point;

/// Cursor side length in pixels.
pub const CURSOR_SIZE: usize = 16;

/// Bytes per bitmap plane (16 rows × 2 bytes).
pub const CURSOR_PLANE_LEN: usize = CURSOR_SIZE * CURSOR_SIZE / 8;

/// A cursor as carried on the wire by `Tcursor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Offset of the hot spot relative to the top-left of the image,
    /// stored negated in the usual Plan 9 fashion.
    pub offset: Point,
    pub clr: [u8; CURSOR_PLANE_LEN],
    pub set: [u8; CURSOR_PLANE_LEN],
}

impl Cursor {
    pub fn new(offset: Point, clr: [u8; CURSOR_PLANE_LEN], set: [u8; CURSOR_PLANE_LEN]) -> Self {
        Self { offset, clr, set }
    }

    /// Whether pixel `(x, y)` is lit in `plane`.
    pub fn bit(plane: &[u8; CURSOR_PLANE_LEN], x: usize, y: usize) -> bool {
        let byte = plane[y * 2 + x / 8];
        byte & (0x80 >> (x % 8)) != 0
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            offset: Point::default(),
            clr: [0; CURSOR_PLANE_LEN],
            set: [0; CURSOR_PLANE_LEN],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_addressing() {
        let mut plane = [0u8; CURSOR_PLANE_LEN];
        plane[0] = 0b1000_0000;
        plane[3] = 0b0000_0001;
        assert!(Cursor::bit(&plane, 0, 0));
        assert!(!Cursor::bit(&plane, 1, 0));
        assert!(Cursor::bit(&plane, 15, 1));
        assert!(!Cursor::bit(&plane, 15, 0));
    }
}
