//! Typed protocol messages and their wire encoding.
//!
//! A [`Message`] is one frame: the [`FrameHeader`] fields plus a [`Body`]
//! whose variant fixes both the tag and the field layout. Encoding is
//! infallible and always recomputes the length prefix; decoding rejects
//! anything that does not exactly fill the frame.
//!
//! ## Field layouts (after the 6-byte header, little-endian)
//! ```text
//! Rerror                   string error
//! Rrdmouse                 i32 x, i32 y, u32 buttons, u32 msec, u8 resized
//! Tmoveto                  i32 x, i32 y
//! Tcursor                  i32 off.x, i32 off.y, [32] clr, [32] set, u8 arrow
//! Tbouncemouse             i32 x, i32 y, u32 buttons
//! Rrdkbd                   u16 rune
//! Tlabel                   string label
//! Tinit                    string winsize, string label
//! Rrdsnarf, Twrsnarf       string snarf
//! Trddraw, Rwrdraw         u32 count
//! Rrddraw, Twrdraw         u32 count, [count] data
//! Tresize                  i32 x0, i32 y0, i32 x1, i32 y1
//! (all others)             no fields
//! ```
//! A `string` is a `u32` byte length followed by UTF-8 bytes.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::DrawError;
use crate::header::{FrameHeader, HEADER_SIZE};
use crate::message::Tag;
use crate::protocol::{CURSOR_PLANE_LEN, Cursor, Mouse, MouseEvent, Point, Rect};

// ── Body ─────────────────────────────────────────────────────────

/// Message payload; one variant per tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Rerror { error: String },

    Trdmouse,
    Rrdmouse(MouseEvent),
    Tmoveto { xy: Point },
    Rmoveto,
    /// `None` resets the cursor to the default arrow.
    Tcursor { cursor: Option<Cursor> },
    Rcursor,
    Tbouncemouse { mouse: Mouse },
    Rbouncemouse,

    Trdkbd,
    Rrdkbd { rune: u16 },

    Tlabel { label: String },
    Rlabel,
    Tinit { winsize: String, label: String },
    Rinit,

    Trdsnarf,
    Rrdsnarf { snarf: String },
    Twrsnarf { snarf: String },
    Rwrsnarf,

    Trddraw { count: u32 },
    Rrddraw { data: Bytes },
    Twrdraw { data: Bytes },
    Rwrdraw { count: u32 },

    Ttop,
    Rtop,
    Tresize { rect: Rect },
    Rresize,
}

impl Body {
    /// The tag this body is sent under.
    pub fn tag(&self) -> Tag {
        match self {
            Body::Rerror { .. } => Tag::Rerror,
            Body::Trdmouse => Tag::Trdmouse,
            Body::Rrdmouse(_) => Tag::Rrdmouse,
            Body::Tmoveto { .. } => Tag::Tmoveto,
            Body::Rmoveto => Tag::Rmoveto,
            Body::Tcursor { .. } => Tag::Tcursor,
            Body::Rcursor => Tag::Rcursor,
            Body::Tbouncemouse { .. } => Tag::Tbouncemouse,
            Body::Rbouncemouse => Tag::Rbouncemouse,
            Body::Trdkbd => Tag::Trdkbd,
            Body::Rrdkbd { .. } => Tag::Rrdkbd,
            Body::Tlabel { .. } => Tag::Tlabel,
            Body::Rlabel => Tag::Rlabel,
            Body::Tinit { .. } => Tag::Tinit,
            Body::Rinit => Tag::Rinit,
            Body::Trdsnarf => Tag::Trdsnarf,
            Body::Rrdsnarf { .. } => Tag::Rrdsnarf,
            Body::Twrsnarf { .. } => Tag::Twrsnarf,
            Body::Rwrsnarf => Tag::Rwrsnarf,
            Body::Trddraw { .. } => Tag::Trddraw,
            Body::Rrddraw { .. } => Tag::Rrddraw,
            Body::Twrdraw { .. } => Tag::Twrdraw,
            Body::Rwrdraw { .. } => Tag::Rwrdraw,
            Body::Ttop => Tag::Ttop,
            Body::Rtop => Tag::Rtop,
            Body::Tresize { .. } => Tag::Tresize,
            Body::Rresize => Tag::Rresize,
        }
    }

    /// Encoded size of the fields, header excluded.
    fn fields_len(&self) -> usize {
        match self {
            Body::Rerror { error: s }
            | Body::Tlabel { label: s }
            | Body::Rrdsnarf { snarf: s }
            | Body::Twrsnarf { snarf: s } => string_len(s),
            Body::Tinit { winsize, label } => string_len(winsize) + string_len(label),
            Body::Rrdmouse(_) => 4 * 4 + 1,
            Body::Tmoveto { .. } => 4 * 2,
            Body::Tcursor { .. } => CURSOR_FIELDS_LEN,
            Body::Tbouncemouse { .. } => 4 * 3,
            Body::Rrdkbd { .. } => 2,
            Body::Trddraw { .. } | Body::Rwrdraw { .. } => 4,
            Body::Rrddraw { data } | Body::Twrdraw { data } => 4 + data.len(),
            Body::Tresize { .. } => 4 * 4,
            Body::Trdmouse
            | Body::Rmoveto
            | Body::Rcursor
            | Body::Rbouncemouse
            | Body::Trdkbd
            | Body::Rlabel
            | Body::Rinit
            | Body::Trdsnarf
            | Body::Rwrsnarf
            | Body::Ttop
            | Body::Rtop
            | Body::Rresize => 0,
        }
    }
}

/// offset (8) + clr + set + arrow flag (1)
const CURSOR_FIELDS_LEN: usize = 8 + 2 * CURSOR_PLANE_LEN + 1;

fn string_len(s: &str) -> usize {
    4 + s.len()
}

// ── Message ──────────────────────────────────────────────────────

/// A complete protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Client transaction number, echoed in the reply.
    pub serial: u8,
    pub body: Body,
}

impl Message {
    pub fn new(serial: u8, body: Body) -> Self {
        Self { serial, body }
    }

    /// Shorthand for an `Rerror` reply.
    pub fn error(serial: u8, error: impl Into<String>) -> Self {
        Self::new(
            serial,
            Body::Rerror {
                error: error.into(),
            },
        )
    }

    /// A reply carrying this message's serial.
    pub fn reply_with(&self, body: Body) -> Self {
        Self::new(self.serial, body)
    }

    pub fn tag(&self) -> Tag {
        self.body.tag()
    }

    /// Exact encoded size, length prefix included.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.body.fields_len()
    }

    /// Append the wire encoding to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        let length = self.encoded_len();
        dst.reserve(length);
        let header = FrameHeader {
            length: length as u32,
            serial: self.serial,
            tag: self.tag(),
        };
        dst.put_slice(&header.encode());

        match &self.body {
            Body::Rerror { error: s }
            | Body::Tlabel { label: s }
            | Body::Rrdsnarf { snarf: s }
            | Body::Twrsnarf { snarf: s } => put_string(dst, s),
            Body::Tinit { winsize, label } => {
                put_string(dst, winsize);
                put_string(dst, label);
            }
            Body::Rrdmouse(event) => {
                put_mouse(dst, &event.mouse);
                dst.put_u32_le(event.mouse.msec);
                dst.put_u8(event.resized as u8);
            }
            Body::Tmoveto { xy } => put_point(dst, *xy),
            Body::Tcursor { cursor } => {
                let (c, arrow) = match cursor {
                    Some(c) => (*c, false),
                    None => (Cursor::default(), true),
                };
                put_point(dst, c.offset);
                dst.put_slice(&c.clr);
                dst.put_slice(&c.set);
                dst.put_u8(arrow as u8);
            }
            Body::Tbouncemouse { mouse } => put_mouse(dst, mouse),
            Body::Rrdkbd { rune } => dst.put_u16_le(*rune),
            Body::Trddraw { count } | Body::Rwrdraw { count } => dst.put_u32_le(*count),
            Body::Rrddraw { data } | Body::Twrdraw { data } => {
                dst.put_u32_le(data.len() as u32);
                dst.put_slice(data);
            }
            Body::Tresize { rect } => {
                put_point(dst, rect.min);
                put_point(dst, rect.max);
            }
            Body::Trdmouse
            | Body::Rmoveto
            | Body::Rcursor
            | Body::Rbouncemouse
            | Body::Trdkbd
            | Body::Rlabel
            | Body::Rinit
            | Body::Trdsnarf
            | Body::Rwrsnarf
            | Body::Ttop
            | Body::Rtop
            | Body::Rresize => {}
        }
    }

    /// Encode into a fresh buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Decode exactly one frame.
    ///
    /// `frame` must hold the whole frame, length prefix included, and
    /// nothing else.
    pub fn decode(frame: &[u8]) -> Result<Self, DrawError> {
        let header = FrameHeader::decode(frame)?;
        if header.length as usize != frame.len() {
            return Err(DrawError::invalid(format!(
                "declared length {} does not match frame of {} bytes",
                header.length,
                frame.len()
            )));
        }

        let mut fields = Fields {
            tag: header.tag,
            buf: &frame[HEADER_SIZE..],
        };
        let body = match header.tag {
            Tag::Rerror => Body::Rerror {
                error: fields.string()?,
            },
            Tag::Trdmouse => Body::Trdmouse,
            Tag::Rrdmouse => {
                let xy = fields.point()?;
                let buttons = fields.u32()?;
                let msec = fields.u32()?;
                let resized = fields.u8()? != 0;
                Body::Rrdmouse(MouseEvent {
                    mouse: Mouse::new(xy, buttons, msec),
                    resized,
                })
            }
            Tag::Tmoveto => Body::Tmoveto { xy: fields.point()? },
            Tag::Rmoveto => Body::Rmoveto,
            Tag::Tcursor => {
                let offset = fields.point()?;
                let clr = fields.plane()?;
                let set = fields.plane()?;
                let arrow = fields.u8()? != 0;
                Body::Tcursor {
                    cursor: (!arrow).then(|| Cursor::new(offset, clr, set)),
                }
            }
            Tag::Rcursor => Body::Rcursor,
            Tag::Tbouncemouse => {
                let xy = fields.point()?;
                let buttons = fields.u32()?;
                Body::Tbouncemouse {
                    mouse: Mouse::new(xy, buttons, 0),
                }
            }
            Tag::Rbouncemouse => Body::Rbouncemouse,
            Tag::Trdkbd => Body::Trdkbd,
            Tag::Rrdkbd => Body::Rrdkbd {
                rune: fields.u16()?,
            },
            Tag::Tlabel => Body::Tlabel {
                label: fields.string()?,
            },
            Tag::Rlabel => Body::Rlabel,
            Tag::Tinit => {
                let winsize = fields.string()?;
                let label = fields.string()?;
                Body::Tinit { winsize, label }
            }
            Tag::Rinit => Body::Rinit,
            Tag::Trdsnarf => Body::Trdsnarf,
            Tag::Rrdsnarf => Body::Rrdsnarf {
                snarf: fields.string()?,
            },
            Tag::Twrsnarf => Body::Twrsnarf {
                snarf: fields.string()?,
            },
            Tag::Rwrsnarf => Body::Rwrsnarf,
            Tag::Trddraw => Body::Trddraw {
                count: fields.u32()?,
            },
            Tag::Rrddraw => Body::Rrddraw {
                data: fields.counted_bytes()?,
            },
            Tag::Twrdraw => Body::Twrdraw {
                data: fields.counted_bytes()?,
            },
            Tag::Rwrdraw => Body::Rwrdraw {
                count: fields.u32()?,
            },
            Tag::Ttop => Body::Ttop,
            Tag::Rtop => Body::Rtop,
            Tag::Tresize => {
                let min = fields.point()?;
                let max = fields.point()?;
                Body::Tresize {
                    rect: Rect { min, max },
                }
            }
            Tag::Rresize => Body::Rresize,
        };
        fields.finish()?;

        Ok(Self {
            serial: header.serial,
            body,
        })
    }
}

// ── Encoding helpers ─────────────────────────────────────────────

fn put_string(dst: &mut BytesMut, s: &str) {
    dst.put_u32_le(s.len() as u32);
    dst.put_slice(s.as_bytes());
}

fn put_point(dst: &mut BytesMut, p: Point) {
    dst.put_i32_le(p.x);
    dst.put_i32_le(p.y);
}

fn put_mouse(dst: &mut BytesMut, m: &Mouse) {
    put_point(dst, m.xy);
    dst.put_u32_le(m.buttons);
}

// ── Fields ───────────────────────────────────────────────────────

/// Bounds-checked reader over the fields of one frame.
struct Fields<'a> {
    tag: Tag,
    buf: &'a [u8],
}

impl Fields<'_> {
    fn need(&self, n: usize) -> Result<(), DrawError> {
        if self.buf.remaining() < n {
            return Err(DrawError::invalid(format!(
                "{} truncated: need {n} more bytes, have {}",
                self.tag,
                self.buf.remaining()
            )));
        }
        Ok(())
    }

    fn u8(&mut self) -> Result<u8, DrawError> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    fn u16(&mut self) -> Result<u16, DrawError> {
        self.need(2)?;
        Ok(self.buf.get_u16_le())
    }

    fn u32(&mut self) -> Result<u32, DrawError> {
        self.need(4)?;
        Ok(self.buf.get_u32_le())
    }

    fn point(&mut self) -> Result<Point, DrawError> {
        self.need(8)?;
        Ok(Point::new(self.buf.get_i32_le(), self.buf.get_i32_le()))
    }

    fn plane(&mut self) -> Result<[u8; CURSOR_PLANE_LEN], DrawError> {
        self.need(CURSOR_PLANE_LEN)?;
        let mut plane = [0u8; CURSOR_PLANE_LEN];
        self.buf.copy_to_slice(&mut plane);
        Ok(plane)
    }

    fn take(&mut self, n: usize) -> Result<&[u8], DrawError> {
        self.need(n)?;
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn counted_bytes(&mut self) -> Result<Bytes, DrawError> {
        let n = self.u32()? as usize;
        Ok(Bytes::copy_from_slice(self.take(n)?))
    }

    fn string(&mut self) -> Result<String, DrawError> {
        let tag = self.tag;
        let n = self.u32()? as usize;
        let raw = self.take(n)?;
        String::from_utf8(raw.to_vec())
            .map_err(|e| DrawError::invalid(format!("{tag} string is not utf-8: {e}")))
    }

    fn finish(&self) -> Result<(), DrawError> {
        if self.buf.has_remaining() {
            return Err(DrawError::invalid(format!(
                "{} has {} trailing bytes",
                self.tag,
                self.buf.remaining()
            )));
        }
        Ok(())
    }
}
