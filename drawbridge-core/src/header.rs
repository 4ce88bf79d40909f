//! Fixed frame header.
//!
//! ```text
//! length: u32 LE  (4)   total frame length, header included
//! serial: u8      (1)   client transaction number, echoed in the reply
//! tag:    u8      (1)   message tag
//! ```

use crate::error::DrawError;
use crate::message::Tag;

/// Encoded size of the header on the wire.
pub const HEADER_SIZE: usize = 6;

/// Size of the length prefix alone.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Header common to every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub length: u32,
    pub serial: u8,
    pub tag: Tag,
}

impl FrameHeader {
    /// Serialize to bytes (little-endian).
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.length.to_le_bytes());
        buf[4] = self.serial;
        buf[5] = self.tag as u8;
        buf
    }

    /// Deserialize from the start of `data`.
    pub fn decode(data: &[u8]) -> Result<Self, DrawError> {
        let Some(bytes) = data.first_chunk::<HEADER_SIZE>() else {
            return Err(DrawError::invalid(format!(
                "frame shorter than header: {} < {HEADER_SIZE}",
                data.len()
            )));
        };
        let length = read_length_prefix([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let tag = Tag::try_from(bytes[5])
            .map_err(|e| DrawError::invalid(e.to_string()))?;
        Ok(Self {
            length,
            serial: bytes[4],
            tag,
        })
    }
}

/// Read the little-endian length prefix at the start of a frame.
pub fn read_length_prefix(prefix: [u8; LENGTH_PREFIX_SIZE]) -> u32 {
    u32::from_le_bytes(prefix)
}
