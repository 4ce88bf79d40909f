//! Message tags of the window-system protocol.
//!
//! Tags are allocated in consecutive request/reply pairs starting at 2:
//! a request tag is even and its reply is `tag | 1`. Tag 1 (`Rerror`) is
//! the single error reply shared by every request.
//!
//! A closed enum with `TryFrom`: unknown values are an error, not a panic.

use crate::error::DrawError;
use std::fmt;

/// Number of request tags, i.e. entries in the dispatch table.
pub const REQUEST_COUNT: usize = 13;

// ── Tag ──────────────────────────────────────────────────────────

/// All message tags understood by the protocol.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Error reply to any request.
    Rerror = 1,

    // ── Mouse ────────────────────────────────────────────────────
    /// Read the next mouse event.
    Trdmouse = 2,
    Rrdmouse = 3,
    /// Warp the pointer.
    Tmoveto = 4,
    Rmoveto = 5,
    /// Set or reset the cursor image.
    Tcursor = 6,
    Rcursor = 7,
    /// Inject a mouse event back into the event stream.
    Tbouncemouse = 8,
    Rbouncemouse = 9,

    // ── Keyboard ─────────────────────────────────────────────────
    /// Read the next keyboard rune.
    Trdkbd = 10,
    Rrdkbd = 11,

    // ── Window ───────────────────────────────────────────────────
    /// Set the window title.
    Tlabel = 12,
    Rlabel = 13,
    /// Create the window.
    Tinit = 14,
    Rinit = 15,

    // ── Snarf (clipboard) ────────────────────────────────────────
    Trdsnarf = 16,
    Rrdsnarf = 17,
    Twrsnarf = 18,
    Rwrsnarf = 19,

    // ── Draw-data channel ────────────────────────────────────────
    Trddraw = 20,
    Rrddraw = 21,
    Twrdraw = 22,
    Rwrdraw = 23,

    // ── Window management ────────────────────────────────────────
    /// Raise the window.
    Ttop = 24,
    Rtop = 25,
    /// Resize the window.
    Tresize = 26,
    Rresize = 27,
}

impl TryFrom<u8> for Tag {
    type Error = DrawError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tag::Rerror),
            2 => Ok(Tag::Trdmouse),
            3 => Ok(Tag::Rrdmouse),
            4 => Ok(Tag::Tmoveto),
            5 => Ok(Tag::Rmoveto),
            6 => Ok(Tag::Tcursor),
            7 => Ok(Tag::Rcursor),
            8 => Ok(Tag::Tbouncemouse),
            9 => Ok(Tag::Rbouncemouse),
            10 => Ok(Tag::Trdkbd),
            11 => Ok(Tag::Rrdkbd),
            12 => Ok(Tag::Tlabel),
            13 => Ok(Tag::Rlabel),
            14 => Ok(Tag::Tinit),
            15 => Ok(Tag::Rinit),
            16 => Ok(Tag::Trdsnarf),
            17 => Ok(Tag::Rrdsnarf),
            18 => Ok(Tag::Twrsnarf),
            19 => Ok(Tag::Rwrsnarf),
            20 => Ok(Tag::Trddraw),
            21 => Ok(Tag::Rrddraw),
            22 => Ok(Tag::Twrdraw),
            23 => Ok(Tag::Rwrdraw),
            24 => Ok(Tag::Ttop),
            25 => Ok(Tag::Rtop),
            26 => Ok(Tag::Tresize),
            27 => Ok(Tag::Rresize),
            _ => Err(DrawError::UnknownVariant {
                type_name: "Tag",
                value: value as u64,
            }),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Tag {
    /// Returns `true` for request tags (even values).
    pub fn is_request(self) -> bool {
        (self as u8) & 1 == 0
    }

    /// The reply tag paired with this tag (`tag | 1`).
    ///
    /// Reply tags map to themselves.
    pub fn reply(self) -> Tag {
        match self {
            Tag::Trdmouse => Tag::Rrdmouse,
            Tag::Tmoveto => Tag::Rmoveto,
            Tag::Tcursor => Tag::Rcursor,
            Tag::Tbouncemouse => Tag::Rbouncemouse,
            Tag::Trdkbd => Tag::Rrdkbd,
            Tag::Tlabel => Tag::Rlabel,
            Tag::Tinit => Tag::Rinit,
            Tag::Trdsnarf => Tag::Rrdsnarf,
            Tag::Twrsnarf => Tag::Rwrsnarf,
            Tag::Trddraw => Tag::Rrddraw,
            Tag::Twrdraw => Tag::Rwrdraw,
            Tag::Ttop => Tag::Rtop,
            Tag::Tresize => Tag::Rresize,
            reply => reply,
        }
    }

    /// Dense dispatch index `(tag >> 1) - 1`.
    ///
    /// `Rerror` has no slot and yields `None`.
    pub fn handler_index(self) -> Option<usize> {
        ((self as u8 >> 1) as usize).checked_sub(1)
    }
}
