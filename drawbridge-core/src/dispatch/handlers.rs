//! One handler per request tag.
//!
//! Each handler validates its request, calls the backend or draw channel,
//! and returns the reply body. Errors are left to [`dispatch`] to turn
//! into `Rerror` replies.
//!
//! [`dispatch`]: super::dispatch

use std::io;

use bytes::BytesMut;
use tracing::{debug, info};

use super::{Context, RDDRAW_MAX};
use crate::backend::CursorImage;
use crate::error::DrawError;
use crate::packet::{Body, Message};
use crate::protocol::{Rect, parse_winsize};
use crate::state::CursorState;

/// The table routed a message to the wrong handler.
fn misrouted(msg: &Message, expected: &str) -> DrawError {
    DrawError::invalid(format!("{} routed to the {expected} handler", msg.tag()))
}

/// Width and height of a client rectangle.
///
/// Wire coordinates are arbitrary `i32`s, so the extent may not fit, and
/// an empty or inverted rectangle is not a window size.
fn window_size(rect: &Rect) -> Result<(i32, i32), DrawError> {
    let (Some(width), Some(height)) = (rect.dx(), rect.dy()) else {
        return Err(DrawError::Geometry(format!(
            "window rectangle ({}, {})-({}, {}) out of range",
            rect.min.x, rect.min.y, rect.max.x, rect.max.y
        )));
    };
    if width <= 0 || height <= 0 {
        return Err(DrawError::Geometry(format!(
            "invalid window size {width}x{height}"
        )));
    }
    Ok((width, height))
}

// ── Mouse ────────────────────────────────────────────────────────

pub fn rdmouse(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Trdmouse = msg.body else {
        return Err(misrouted(msg, "rdmouse"));
    };
    let event = cx.backend.read_mouse()?;
    Ok(Body::Rrdmouse(event))
}

pub fn moveto(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Tmoveto { xy } = msg.body else {
        return Err(misrouted(msg, "moveto"));
    };
    let window = cx.session.require_window()?;
    cx.backend.warp_pointer(window, xy)?;
    Ok(Body::Rmoveto)
}

/// Install the client's bitmap, or reset to the default arrow when the
/// request carries none. The backend releases the cursor it replaces.
///
/// The old cursor is dropped before the new image is built, so a bitmap
/// that cannot be converted leaves the default arrow installed.
pub fn cursor(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Tcursor { cursor } = &msg.body else {
        return Err(misrouted(msg, "cursor"));
    };
    cx.backend.set_cursor(None)?;
    cx.session.set_cursor(CursorState::Default);
    if let Some(c) = cursor {
        let image = CursorImage::from_cursor(c)?;
        cx.backend.set_cursor(Some(&image))?;
        cx.session.set_cursor(CursorState::Custom(*c));
    }
    Ok(Body::Rcursor)
}

pub fn bouncemouse(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Tbouncemouse { mouse } = msg.body else {
        return Err(misrouted(msg, "bouncemouse"));
    };
    cx.backend.bounce_mouse(mouse)?;
    Ok(Body::Rbouncemouse)
}

// ── Keyboard ─────────────────────────────────────────────────────

pub fn rdkbd(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Trdkbd = msg.body else {
        return Err(misrouted(msg, "rdkbd"));
    };
    let rune = cx.backend.read_key()?;
    Ok(Body::Rrdkbd { rune })
}

// ── Window ───────────────────────────────────────────────────────

pub fn label(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Tlabel { label } = &msg.body else {
        return Err(misrouted(msg, "label"));
    };
    let window = cx.session.require_window()?;
    cx.backend.set_title(window, label)?;
    Ok(Body::Rlabel)
}

/// Create the window.
///
/// An empty geometry string means the default size at a position of the
/// backend's choosing. The session only records the handle once the
/// backend has created the window.
pub fn init(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Tinit { winsize, label } = &msg.body else {
        return Err(misrouted(msg, "init"));
    };

    let (origin, width, height) = if winsize.is_empty() {
        (None, cx.settings.default_width, cx.settings.default_height)
    } else {
        let geometry = parse_winsize(winsize)?;
        let (width, height) = window_size(&geometry.rect)?;
        (geometry.origin(), width, height)
    };

    let window = cx.backend.create_window(label, origin, width, height)?;
    cx.session.attach_window(window);
    info!(?window, width, height, ?origin, label = %label, "window created");
    Ok(Body::Rinit)
}

pub fn top(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Ttop = msg.body else {
        return Err(misrouted(msg, "top"));
    };
    let window = cx.session.require_window()?;
    cx.backend.raise(window)?;
    Ok(Body::Rtop)
}

pub fn resize(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Tresize { rect } = msg.body else {
        return Err(misrouted(msg, "resize"));
    };
    let window = cx.session.require_window()?;
    let (width, height) = window_size(&rect)?;
    cx.backend.resize(window, width, height)?;
    Ok(Body::Rresize)
}

// ── Snarf ────────────────────────────────────────────────────────

/// The backend hands over an owned copy of the clipboard; it lives in
/// the reply body and is dropped once the reply is written.
pub fn rdsnarf(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Trdsnarf = msg.body else {
        return Err(misrouted(msg, "rdsnarf"));
    };
    let snarf = cx.backend.get_clipboard_text()?;
    Ok(Body::Rrdsnarf { snarf })
}

pub fn wrsnarf(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Twrsnarf { snarf } = &msg.body else {
        return Err(misrouted(msg, "wrsnarf"));
    };
    cx.backend.set_clipboard_text(snarf)?;
    Ok(Body::Rwrsnarf)
}

// ── Draw data ────────────────────────────────────────────────────

/// Read up to `min(count, RDDRAW_MAX)` bytes in a single read.
///
/// A short read is returned as-is. Zero bytes for a nonzero request
/// means the channel is gone.
pub fn rddraw(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Trddraw { count } = msg.body else {
        return Err(misrouted(msg, "rddraw"));
    };
    let want = (count as usize).min(RDDRAW_MAX);
    let mut buf = BytesMut::zeroed(want);
    let n = cx
        .draw
        .read_draw_bytes(&mut buf)
        .map_err(DrawError::DrawChannel)?;
    if n == 0 && want > 0 {
        return Err(DrawError::DrawChannel(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "end of stream",
        )));
    }
    buf.truncate(n);
    debug!(requested = count, read = n, "rddraw");
    Ok(Body::Rrddraw { data: buf.freeze() })
}

pub fn wrdraw(msg: &Message, cx: &mut Context<'_>) -> Result<Body, DrawError> {
    let Body::Twrdraw { data } = &msg.body else {
        return Err(misrouted(msg, "wrdraw"));
    };
    cx.draw
        .write_draw_bytes(data)
        .map_err(DrawError::DrawChannel)?;
    Ok(Body::Rwrdraw {
        count: data.len() as u32,
    })
}
