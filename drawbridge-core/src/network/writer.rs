//! Reply emitter over the control output channel.

use std::io::Write;

use bytes::BytesMut;
use tracing::trace;

use crate::error::DrawError;
use crate::packet::Message;

/// Serializes messages into a reusable buffer and writes them out whole.
pub struct ReplyWriter<W> {
    inner: W,
    buf: BytesMut,
}

impl<W: Write> ReplyWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: BytesMut::new(),
        }
    }

    /// Write one message and flush.
    ///
    /// Any failure here is transport-fatal.
    pub fn send(&mut self, msg: &Message) -> Result<(), DrawError> {
        self.buf.clear();
        msg.encode(&mut self.buf);
        self.inner.write_all(&self.buf)?;
        self.inner.flush()?;
        trace!(tag = %msg.tag(), serial = msg.serial, len = self.buf.len(), "reply written");
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Body;

    #[test]
    fn writes_whole_frames() {
        let mut writer = ReplyWriter::new(Vec::new());
        let a = Message::new(1, Body::Rtop);
        let b = Message::error(2, "nope");
        writer.send(&a).unwrap();
        writer.send(&b).unwrap();

        let mut expected = a.to_bytes().to_vec();
        expected.extend_from_slice(&b.to_bytes());
        assert_eq!(writer.into_inner(), expected);
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_fatal() {
        let mut writer = ReplyWriter::new(Broken);
        let err = writer.send(&Message::new(0, Body::Rtop)).unwrap_err();
        assert!(err.is_fatal());
    }
}
