//! # drawbridge-core
//!
//! Protocol library for the drawbridge window-system bridge.
//!
//! A graphics client speaks length-prefixed `Wsysmsg` requests over a pair
//! of byte streams; this crate decodes them, runs the matching handler
//! against a display backend and writes one reply per request.
//!
//! This crate contains:
//! - **Protocol types**: `Tag`, `FrameHeader`, `Message`, `Body`, and the
//!   `Point` / `Rect` / `Cursor` / `Mouse` payloads
//! - **Codec**: `WsysCodec` for framed async I/O via `tokio_util`
//! - **Network**: `FrameReader` and `ReplyWriter` for the blocking loop
//! - **Dispatch**: the tag-indexed handler table
//! - **Backend**: `DisplayBackend` and `DrawChannel` seams, plus a headless
//!   backend
//! - **Server**: the request/reply loop
//! - **Error**: `DrawError`, split into fatal and per-request failures

pub mod backend;
pub mod codec;
pub mod dispatch;
pub mod error;
pub mod header;
pub mod message;
pub mod network;
pub mod packet;
pub mod protocol;
pub mod server;
pub mod state;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use backend::{
    DisplayBackend, DrawChannel, HeadlessBackend, LoopbackDrawChannel, StreamDrawChannel,
    WindowHandle,
};
pub use codec::WsysCodec;
pub use dispatch::{HandlerSettings, RDDRAW_MAX};
pub use error::{BackendError, DrawError};
pub use header::{FrameHeader, HEADER_SIZE};
pub use message::Tag;
pub use network::{FrameReader, MAX_FRAME_SIZE, ReplyWriter};
pub use packet::{Body, Message};
pub use protocol::{Cursor, Mouse, MouseEvent, Point, Rect, parse_winsize};
pub use server::{ServeStats, Server};
pub use state::Session;
