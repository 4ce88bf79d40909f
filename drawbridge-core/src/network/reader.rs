//! Blocking frame reader over the control input channel.

use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::trace;

use crate::error::DrawError;
use crate::header::{HEADER_SIZE, LENGTH_PREFIX_SIZE, read_length_prefix};

/// Initial capacity of the read buffer.
pub const MIN_FRAME_CAPACITY: usize = 64;

/// Largest frame the reader accepts.
///
/// Big enough for a maximal `Twrdraw` plus slack.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Reads one length-prefixed frame at a time into a reusable buffer.
///
/// The buffer grows to exactly the largest frame seen so far and never
/// shrinks.
pub struct FrameReader<R> {
    inner: R,
    buf: BytesMut,
    frames_read: u64,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MIN_FRAME_CAPACITY),
            frames_read: 0,
        }
    }

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly on a frame
    /// boundary. A stream that ends anywhere else is
    /// [`DrawError::MessageTooShort`].
    pub fn next_frame(&mut self) -> Result<Option<&[u8]>, DrawError> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        let got = read_full(&mut self.inner, &mut prefix)?;
        if got == 0 {
            return Ok(None);
        }
        if got < LENGTH_PREFIX_SIZE {
            return Err(DrawError::MessageTooShort {
                expected: LENGTH_PREFIX_SIZE,
                actual: got,
            });
        }

        let length = read_length_prefix(prefix) as usize;
        if length < HEADER_SIZE {
            return Err(DrawError::invalid(format!(
                "declared length {length} is shorter than the header"
            )));
        }
        if length > MAX_FRAME_SIZE {
            return Err(DrawError::FrameTooLarge {
                size: length,
                max: MAX_FRAME_SIZE,
            });
        }

        self.grow_to(length);
        self.buf.clear();
        self.buf.extend_from_slice(&prefix);
        self.buf.resize(length, 0);

        let got = read_full(&mut self.inner, &mut self.buf[LENGTH_PREFIX_SIZE..])?;
        if got < length - LENGTH_PREFIX_SIZE {
            return Err(DrawError::MessageTooShort {
                expected: length,
                actual: LENGTH_PREFIX_SIZE + got,
            });
        }

        self.frames_read += 1;
        trace!(length, frame = self.frames_read, "frame read");
        Ok(Some(&self.buf[..]))
    }

    /// Current capacity of the read buffer.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Number of complete frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn grow_to(&mut self, length: usize) {
        if length > self.buf.capacity() {
            let old = self.buf.capacity();
            self.buf = BytesMut::with_capacity(length);
            trace!(old, new = length, "read buffer grown");
        }
    }
}

/// Fill `buf` as far as the stream allows; returns the byte count.
///
/// Stops early only at end of stream. Interrupted reads are retried.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, DrawError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(DrawError::Io(e)),
        }
    }
    Ok(filled)
}
