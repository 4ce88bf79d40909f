//! Points, rectangles and the window-size strings carried by `Tinit`.

use crate::error::DrawError;

// ── Point / Rect ─────────────────────────────────────────────────

/// A point in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A half-open rectangle `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    /// Width, or `None` if it does not fit in an `i32`.
    pub fn dx(&self) -> Option<i32> {
        self.max.x.checked_sub(self.min.x)
    }

    /// Height, or `None` if it does not fit in an `i32`.
    pub fn dy(&self) -> Option<i32> {
        self.max.y.checked_sub(self.min.y)
    }

    /// The rectangle moved by `p`, or `None` if a corner overflows.
    pub fn translate(&self, p: Point) -> Option<Rect> {
        Some(Rect::new(
            self.min.x.checked_add(p.x)?,
            self.min.y.checked_add(p.y)?,
            self.max.x.checked_add(p.x)?,
            self.max.y.checked_add(p.y)?,
        ))
    }
}

// ── WindowGeometry ───────────────────────────────────────────────

/// Result of parsing a window-size string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub rect: Rect,
    /// Whether the string pinned the window origin.
    pub has_origin: bool,
}

impl WindowGeometry {
    /// The requested origin, if one was given.
    pub fn origin(&self) -> Option<Point> {
        self.has_origin.then_some(self.rect.min)
    }
}

/// Parse a window-size string.
///
/// Accepted forms:
/// - `WxH`: size only
/// - `WxH@X,Y` or `WxH@X Y`: size and origin
/// - `X0,Y0,X1,Y1` or `X0 Y0 X1 Y1`: full rectangle
///
/// Numbers are unsigned decimal.
pub fn parse_winsize(s: &str) -> Result<WindowGeometry, DrawError> {
    parse_inner(s).ok_or_else(|| DrawError::Geometry(format!("bad syntax in window size '{s}'")))
}

fn parse_inner(s: &str) -> Option<WindowGeometry> {
    let mut cur = Scanner { rest: s };
    let first = cur.number()?;

    if cur.eat('x') {
        let height = cur.number()?;
        let size = Rect::new(0, 0, first, height);
        if cur.is_empty() {
            return Some(WindowGeometry {
                rect: size,
                has_origin: false,
            });
        }
        if !cur.eat('@') {
            return None;
        }
        let x = cur.number()?;
        if !cur.eat(',') && !cur.eat(' ') {
            return None;
        }
        let y = cur.number()?;
        if !cur.is_empty() {
            return None;
        }
        return Some(WindowGeometry {
            rect: size.translate(Point::new(x, y))?,
            has_origin: true,
        });
    }

    let sep = cur.peek()?;
    if sep != ' ' && sep != ',' {
        return None;
    }
    let mut coords = [first, 0, 0, 0];
    for slot in coords.iter_mut().skip(1) {
        if !cur.eat(sep) {
            return None;
        }
        *slot = cur.number()?;
    }
    if !cur.is_empty() {
        return None;
    }
    let [x0, y0, x1, y1] = coords;
    Some(WindowGeometry {
        rect: Rect::new(x0, y0, x1, y1),
        has_origin: true,
    })
}

/// Minimal scanner over the geometry string.
struct Scanner<'a> {
    rest: &'a str,
}

impl Scanner<'_> {
    fn number(&mut self) -> Option<i32> {
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let value = self.rest[..end].parse().ok()?;
        self.rest = &self.rest[end..];
        Some(value)
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        match self.rest.strip_prefix(c) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_overflow_is_none() {
        let r = Rect::new(-10, 0, i32::MAX, 10);
        assert_eq!(r.dx(), None);
        assert_eq!(r.dy(), Some(10));
        assert_eq!(Rect::new(0, i32::MIN, 0, 1).dy(), None);
        assert_eq!(Rect::new(0, 0, 5, 5).translate(Point::new(i32::MAX, 0)), None);
    }

    #[test]
    fn size_only() {
        let g = parse_winsize("800x600").unwrap();
        assert_eq!(g.rect, Rect::new(0, 0, 800, 600));
        assert!(!g.has_origin);
        assert_eq!(g.origin(), None);
    }

    #[test]
    fn size_with_origin() {
        let g = parse_winsize("800x600@10,20").unwrap();
        assert_eq!(g.rect, Rect::new(10, 20, 810, 620));
        assert_eq!(g.origin(), Some(Point::new(10, 20)));
        assert_eq!(g.rect.dx(), Some(800));
        assert_eq!(g.rect.dy(), Some(600));

        let g = parse_winsize("800x600@10 20").unwrap();
        assert_eq!(g.rect.min, Point::new(10, 20));
    }

    #[test]
    fn full_rectangle() {
        let g = parse_winsize("5,6,105,206").unwrap();
        assert_eq!(g.rect, Rect::new(5, 6, 105, 206));
        assert!(g.has_origin);

        let g = parse_winsize("5 6 105 206").unwrap();
        assert_eq!(g.rect, Rect::new(5, 6, 105, 206));
    }

    #[test]
    fn rejects_malformed() {
        for bad in [
            "", "x600", "800x", "800x600@", "800x600@10", "800x600@10,", "800x600!",
            "5,6,105", "5,6 105,206", "5,6,105,206,", "-5,6,105,206", "abc",
            "2147483647x10@1,0", "10x2147483647@0 5", "2147483648x10",
        ] {
            let err = parse_winsize(bad).unwrap_err();
            assert_eq!(err.to_string(), format!("bad syntax in window size '{bad}'"));
        }
    }
}
