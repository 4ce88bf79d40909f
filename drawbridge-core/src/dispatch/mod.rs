//! Request dispatch.
//!
//! Request tags are dense, so the table is a flat array indexed by
//! [`Tag::handler_index`]. Handlers return either the reply body or an
//! error; [`dispatch`] turns recoverable errors into `Rerror` replies and
//! lets fatal ones through.

pub mod handlers;

use tracing::{debug, warn};

use crate::backend::{DisplayBackend, DrawChannel};
use crate::error::DrawError;
use crate::message::{REQUEST_COUNT, Tag};
use crate::packet::{Body, Message};
use crate::state::Session;

/// Window size used when `Tinit` carries no geometry.
pub const DEFAULT_WINDOW_WIDTH: i32 = 640;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 480;

/// Largest `Trddraw` count honoured; larger requests are clamped.
pub const RDDRAW_MAX: usize = 0x10000;

/// Tunables handlers read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerSettings {
    pub default_width: i32,
    pub default_height: i32,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_WINDOW_WIDTH,
            default_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Everything a handler may touch while serving one request.
pub struct Context<'a> {
    pub session: &'a mut Session,
    pub backend: &'a mut dyn DisplayBackend,
    pub draw: &'a mut dyn DrawChannel,
    pub settings: &'a HandlerSettings,
}

/// A request handler.
pub type Handler = fn(&Message, &mut Context<'_>) -> Result<Body, DrawError>;

/// Indexed by `(tag >> 1) - 1`.
static HANDLERS: [Handler; REQUEST_COUNT] = [
    handlers::rdmouse,
    handlers::moveto,
    handlers::cursor,
    handlers::bouncemouse,
    handlers::rdkbd,
    handlers::label,
    handlers::init,
    handlers::rdsnarf,
    handlers::wrsnarf,
    handlers::rddraw,
    handlers::wrdraw,
    handlers::top,
    handlers::resize,
];

/// Find the handler for a request tag.
///
/// Reply tags and anything outside the table are protocol violations.
pub fn lookup(tag: Tag) -> Result<Handler, DrawError> {
    if !tag.is_request() {
        return Err(DrawError::invalid(format!("{tag} is not a request")));
    }
    tag.handler_index()
        .and_then(|i| HANDLERS.get(i))
        .copied()
        .ok_or_else(|| DrawError::invalid(format!("no handler for {tag}")))
}

/// Serve one request and build its reply.
///
/// Returns `Err` only for fatal errors; every other failure becomes an
/// `Rerror` reply carrying the request's serial.
pub fn dispatch(request: &Message, cx: &mut Context<'_>) -> Result<Message, DrawError> {
    let tag = request.tag();
    let handler = lookup(tag)?;
    debug!(%tag, serial = request.serial, "dispatch");

    match handler(request, cx) {
        Ok(body) => {
            debug_assert_eq!(body.tag(), tag.reply());
            Ok(request.reply_with(body))
        }
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            let text = error_text(&e, &*cx.backend);
            warn!(%tag, serial = request.serial, error = %text, "request failed");
            Ok(Message::error(request.serial, text))
        }
    }
}

/// Text carried by the `Rerror` reply.
///
/// Backend errors without a message fall back to the backend's own
/// last-error string.
fn error_text(e: &DrawError, backend: &dyn DisplayBackend) -> String {
    match e {
        DrawError::Backend(b) if b.0.is_empty() => backend.last_error(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_request_has_a_handler() {
        for value in (2u8..=26).step_by(2) {
            let tag = Tag::try_from(value).unwrap();
            assert!(lookup(tag).is_ok(), "{tag}");
        }
    }

    #[test]
    fn replies_are_not_routable() {
        for value in (1u8..=27).step_by(2) {
            let tag = Tag::try_from(value).unwrap();
            let err = lookup(tag).err().unwrap();
            assert!(err.is_fatal());
        }
    }
}
