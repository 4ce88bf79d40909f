//! Auxiliary draw-data channel.
//!
//! Raw bytes with no framing of their own; only `Trddraw` and `Twrdraw`
//! touch it.

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read, Write};

/// Byte channel used by the draw read/write requests.
pub trait DrawChannel {
    /// Read at most `buf.len()` bytes. A short count is not an error.
    fn read_draw_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write all of `data`.
    fn write_draw_bytes(&mut self, data: &[u8]) -> io::Result<()>;
}

// ── StreamDrawChannel ────────────────────────────────────────────

/// Draw channel over any byte stream (typically an inherited descriptor).
pub struct StreamDrawChannel<T> {
    inner: T,
}

impl<T: Read + Write> StreamDrawChannel<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Write> DrawChannel for StreamDrawChannel<T> {
    fn read_draw_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }

    fn write_draw_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.inner.write_all(data)?;
        self.inner.flush()
    }
}

// ── LoopbackDrawChannel ──────────────────────────────────────────

/// In-memory FIFO: bytes written are handed back by later reads.
#[derive(Debug, Default)]
pub struct LoopbackDrawChannel {
    pending: VecDeque<u8>,
}

impl LoopbackDrawChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for the next reads.
    pub fn feed(&mut self, data: &[u8]) {
        self.pending.extend(data);
    }

    /// Bytes waiting to be read.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl DrawChannel for LoopbackDrawChannel {
    fn read_draw_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write_draw_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.feed(data);
        Ok(())
    }
}
