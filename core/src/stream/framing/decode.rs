use bytes::{Buf, BytesMut};

use crate::stream::framing::types::{FrameError, FrameHeader};
use crate::stream::transform::StreamTransform;
use crate::types::StreamError;

/// Decode side: buffers arbitrary input and emits one chunk per frame.
///
/// At most one frame is released per `transform` call. Further complete
/// frames stay buffered and are announced through `has_pending_output`.
#[derive(Debug)]
pub struct FrameDecoder {
    buf: BytesMut,
    max_frame_len: u32,
}

impl FrameDecoder {
    pub fn new(max_frame_len: u32) -> Self {
        Self { buf: BytesMut::new(), max_frame_len }
    }

    /// Split the next complete frame off the buffer.
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>, FrameError> {
        let Some(header) = FrameHeader::parse(&self.buf) else {
            return Ok(None);
        };
        if header.payload_len > self.max_frame_len {
            return Err(FrameError::FrameTooLarge {
                len: header.payload_len as u64,
                max: self.max_frame_len,
            });
        }
        if self.buf.len() < header.frame_len() {
            return Ok(None);
        }

        self.buf.advance(FrameHeader::LEN);
        let payload = self.buf.split_to(header.payload_len as usize);
        Ok(Some(payload.to_vec()))
    }
}

impl StreamTransform for FrameDecoder {
    fn name(&self) -> &'static str {
        "frame-decode"
    }

    fn transform(&mut self, input: &[u8]) -> Result<Option<Vec<u8>>, StreamError> {
        self.buf.extend_from_slice(input);
        Ok(self.next_frame()?)
    }

    fn finish(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        if self.buf.is_empty() {
            return Ok(None);
        }

        let need = match FrameHeader::parse(&self.buf) {
            Some(header) => header.frame_len(),
            None => FrameHeader::LEN,
        };
        Err(FrameError::Truncated { have: self.buf.len(), need }.into())
    }

    // Oversized prefixes also count, so the error surfaces on the next pull.
    fn has_pending_output(&self) -> bool {
        match FrameHeader::parse(&self.buf) {
            Some(header) => {
                header.payload_len > self.max_frame_len || self.buf.len() >= header.frame_len()
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::framing::encode::encode_frame;

    #[test]
    fn one_frame_per_pull_with_remainder_buffered() {
        let mut wire = encode_frame(b"ab", 64).unwrap();
        wire.extend(encode_frame(b"", 64).unwrap());
        wire.extend(encode_frame(b"cde", 64).unwrap());

        let mut dec = FrameDecoder::new(64);
        assert_eq!(dec.transform(&wire).unwrap(), Some(b"ab".to_vec()));
        assert!(dec.has_pending_output());
        assert_eq!(dec.transform(&[]).unwrap(), Some(Vec::new()));
        assert_eq!(dec.transform(&[]).unwrap(), Some(b"cde".to_vec()));
        assert!(!dec.has_pending_output());
        assert_eq!(dec.finish().unwrap(), None);
    }
}
