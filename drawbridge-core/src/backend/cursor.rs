//! Backend cursor images built from wire [`Cursor`]s.

use crate::error::BackendError;
use crate::protocol::{CURSOR_SIZE, Cursor, Point};

/// Colour of one cursor pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorPixel {
    /// Neither plane set.
    Clear,
    /// `set` plane: foreground.
    Black,
    /// `clr` plane only: background.
    White,
    /// Both planes set.
    Inverted,
}

/// A 16×16 cursor image ready for a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorImage {
    /// Row-major pixels.
    pub pixels: [CursorPixel; CURSOR_SIZE * CURSOR_SIZE],
    /// Hot spot within the image.
    pub hot: Point,
}

impl CursorImage {
    /// Build an image from the two wire planes.
    ///
    /// Fails when the hot spot falls outside the 16×16 box.
    pub fn from_cursor(cursor: &Cursor) -> Result<Self, BackendError> {
        let side = CURSOR_SIZE as i32;
        let inside = |offset: i32| offset.checked_neg().filter(|v| (0..side).contains(v));
        let (Some(x), Some(y)) = (inside(cursor.offset.x), inside(cursor.offset.y)) else {
            return Err(BackendError::new(format!(
                "cursor hot spot for offset ({}, {}) outside {CURSOR_SIZE}x{CURSOR_SIZE} image",
                cursor.offset.x, cursor.offset.y
            )));
        };
        let hot = Point::new(x, y);

        let mut pixels = [CursorPixel::Clear; CURSOR_SIZE * CURSOR_SIZE];
        for y in 0..CURSOR_SIZE {
            for x in 0..CURSOR_SIZE {
                let set = Cursor::bit(&cursor.set, x, y);
                let clr = Cursor::bit(&cursor.clr, x, y);
                pixels[y * CURSOR_SIZE + x] = match (set, clr) {
                    (false, false) => CursorPixel::Clear,
                    (true, false) => CursorPixel::Black,
                    (false, true) => CursorPixel::White,
                    (true, true) => CursorPixel::Inverted,
                };
            }
        }
        Ok(Self { pixels, hot })
    }

    pub fn pixel(&self, x: usize, y: usize) -> CursorPixel {
        self.pixels[y * CURSOR_SIZE + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CURSOR_PLANE_LEN;

    #[test]
    fn planes_map_to_pixels() {
        let mut clr = [0u8; CURSOR_PLANE_LEN];
        let mut set = [0u8; CURSOR_PLANE_LEN];
        set[0] = 0b1100_0000;
        clr[0] = 0b1010_0000;
        let cursor = Cursor::new(Point::new(-3, -4), clr, set);

        let image = CursorImage::from_cursor(&cursor).unwrap();
        assert_eq!(image.hot, Point::new(3, 4));
        assert_eq!(image.pixel(0, 0), CursorPixel::Inverted);
        assert_eq!(image.pixel(1, 0), CursorPixel::Black);
        assert_eq!(image.pixel(2, 0), CursorPixel::White);
        assert_eq!(image.pixel(3, 0), CursorPixel::Clear);
        assert_eq!(image.pixel(0, 1), CursorPixel::Clear);
    }

    #[test]
    fn hot_spot_outside_image_fails() {
        let cursor = Cursor::new(Point::new(-16, 0), [0; CURSOR_PLANE_LEN], [0; CURSOR_PLANE_LEN]);
        assert!(CursorImage::from_cursor(&cursor).is_err());
        let cursor = Cursor::new(Point::new(1, 0), [0; CURSOR_PLANE_LEN], [0; CURSOR_PLANE_LEN]);
        assert!(CursorImage::from_cursor(&cursor).is_err());
        let cursor = Cursor::new(Point::new(i32::MIN, 0), [0; CURSOR_PLANE_LEN], [0; CURSOR_PLANE_LEN]);
        let err = CursorImage::from_cursor(&cursor).unwrap_err();
        assert!(err.0.contains("hot spot"));
    }
}
