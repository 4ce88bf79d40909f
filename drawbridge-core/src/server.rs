//! The request/reply loop.
//!
//! Reads one frame at a time, decodes it, dispatches it and writes the
//! reply before reading the next frame. There is exactly one request in
//! flight, so replies go out in request order.

use std::io::{Read, Write};

use tracing::{debug, info};

use crate::backend::{DisplayBackend, DrawChannel};
use crate::dispatch::{Context, HandlerSettings, dispatch};
use crate::error::DrawError;
use crate::message::Tag;
use crate::network::{FrameReader, ReplyWriter};
use crate::packet::Message;
use crate::state::Session;

/// Counters reported when the client closes its end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    /// Requests served, including those answered with `Rerror`.
    pub requests: u64,
    /// Requests answered with `Rerror`.
    pub errors: u64,
}

/// Owns both ends of the protocol stream and everything the handlers use.
pub struct Server<R, W, B, D> {
    reader: FrameReader<R>,
    writer: ReplyWriter<W>,
    session: Session,
    backend: B,
    draw: D,
    settings: HandlerSettings,
}

impl<R, W, B, D> Server<R, W, B, D>
where
    R: Read,
    W: Write,
    B: DisplayBackend,
    D: DrawChannel,
{
    pub fn new(input: R, output: W, backend: B, draw: D) -> Self {
        Self {
            reader: FrameReader::new(input),
            writer: ReplyWriter::new(output),
            session: Session::new(),
            backend,
            draw,
            settings: HandlerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: HandlerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Serve requests until the client closes the stream.
    ///
    /// Returns `Ok` on a clean end-of-stream between frames. Any fatal
    /// error (short frame, malformed message, I/O failure on either
    /// protocol stream) ends the loop and is returned.
    pub fn run(&mut self) -> Result<ServeStats, DrawError> {
        let mut stats = ServeStats::default();

        loop {
            let Some(frame) = self.reader.next_frame()? else {
                info!(
                    requests = stats.requests,
                    errors = stats.errors,
                    "client closed the stream"
                );
                return Ok(stats);
            };
            let request = Message::decode(frame)?;
            debug!(serial = request.serial, tag = %request.tag(), "request");

            let mut cx = Context {
                session: &mut self.session,
                backend: &mut self.backend,
                draw: &mut self.draw,
                settings: &self.settings,
            };
            let reply = dispatch(&request, &mut cx)?;

            stats.requests += 1;
            if reply.tag() == Tag::Rerror {
                stats.errors += 1;
            }
            self.writer.send(&reply)?;
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn draw(&self) -> &D {
        &self.draw
    }

    pub fn output(&self) -> &W {
        self.writer.get_ref()
    }

    /// Tear the server apart, returning the reply stream.
    pub fn into_output(self) -> W {
        self.writer.into_inner()
    }
}
