//! `tokio_util` codec for framed I/O over the same wire format.
//!
//! The server loop is synchronous and uses [`FrameReader`] directly;
//! this codec lets an async client or test harness drive the protocol
//! with `FramedRead` / `FramedWrite`.
//!
//! [`FrameReader`]: crate::network::FrameReader

use bytes::BytesMut;

use crate::error::DrawError;
use crate::header::{HEADER_SIZE, LENGTH_PREFIX_SIZE, read_length_prefix};
use crate::network::MAX_FRAME_SIZE;
use crate::packet::Message;

/// Length-prefixed message codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsysCodec;

impl tokio_util::codec::Decoder for WsysCodec {
    type Item = Message;
    type Error = DrawError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(prefix) = src.first_chunk::<LENGTH_PREFIX_SIZE>() else {
            return Ok(None);
        };
        let length = read_length_prefix(*prefix) as usize;
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
        if src.len() < length {
            src.reserve(length - src.len());
            return Ok(None);
        }

        let frame = src.split_to(length);
        Message::decode(&frame).map(Some)
    }
}

impl tokio_util::codec::Encoder<Message> for WsysCodec {
    type Error = DrawError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        item.encode(dst);
        Ok(())
    }
}

impl tokio_util::codec::Encoder<&Message> for WsysCodec {
    type Error = DrawError;

    fn encode(&mut self, item: &Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        item.encode(dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Body;
    use crate::protocol::Point;
    use tokio_util::codec::{Decoder, Encoder};

    #[test]
    fn decode_waits_for_full_frame() {
        let msg = Message::new(1, Body::Tmoveto { xy: Point::new(5, 6) });
        let bytes = msg.to_bytes();

        let mut codec = WsysCodec;
        let mut buf = BytesMut::new();
        for &b in &bytes[..bytes.len() - 1] {
            buf.extend_from_slice(&[b]);
            assert!(codec.decode(&mut buf).unwrap().is_none());
        }
        buf.extend_from_slice(&bytes[bytes.len() - 1..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(msg));
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_splits_back_to_back_frames() {
        let a = Message::new(1, Body::Ttop);
        let b = Message::new(2, Body::Tlabel { label: "x".into() });

        let mut codec = WsysCodec;
        let mut buf = BytesMut::new();
        codec.encode(&a, &mut buf).unwrap();
        codec.encode(b.clone(), &mut buf).unwrap();

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(a));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(b));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn decode_rejects_short_declared_length() {
        let mut buf = BytesMut::from(&[4u8, 0, 0, 0][..]);
        assert!(WsysCodec.decode(&mut buf).is_err());
    }

    #[test]
    fn decode_rejects_oversized_frame() {
        let mut buf = BytesMut::from(&u32::MAX.to_le_bytes()[..]);
        assert!(matches!(
            WsysCodec.decode(&mut buf),
            Err(DrawError::FrameTooLarge { .. })
        ));
    }
}
