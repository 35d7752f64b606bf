use byteorder::{BigEndian, ByteOrder};

use crate::constants::FRAME_PREFIX_LEN;

/// Wire prefix of a chunk frame.
///
/// Layout:
///
/// ```text
/// [ payload_len (4, u32 big-endian) ]
/// [ payload (payload_len) ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub payload_len: u32,
}

impl FrameHeader {
    pub const LEN: usize = FRAME_PREFIX_LEN;

    pub fn to_bytes(self) -> [u8; FRAME_PREFIX_LEN] {
        let mut out = [0u8; FRAME_PREFIX_LEN];
        BigEndian::write_u32(&mut out, self.payload_len);
        out
    }

    /// Parse a prefix; `None` when fewer than `LEN` bytes are available.
    pub fn parse(wire: &[u8]) -> Option<Self> {
        if wire.len() < Self::LEN {
            return None;
        }
        Some(Self { payload_len: BigEndian::read_u32(&wire[..Self::LEN]) })
    }

    /// Total bytes of the frame on the wire.
    pub fn frame_len(&self) -> usize {
        Self::LEN + self.payload_len as usize
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame too large: {len} > {max}")]
    FrameTooLarge { len: u64, max: u32 },

    #[error("truncated frame: have {have} bytes, need {need}")]
    Truncated { have: usize, need: usize },
}
