use crate::stream::framing::types::{FrameError, FrameHeader};
use crate::stream::transform::StreamTransform;
use crate::types::StreamError;

/// Encode side: one length-prefixed frame per `transform` call.
#[derive(Debug)]
pub struct FrameEncoder {
    max_frame_len: u32,
}

impl FrameEncoder {
    pub fn new(max_frame_len: u32) -> Self {
        Self { max_frame_len }
    }
}

/// Encode one payload into its frame.
pub fn encode_frame(payload: &[u8], max_frame_len: u32) -> Result<Vec<u8>, FrameError> {
    if payload.len() as u64 > max_frame_len as u64 {
        return Err(FrameError::FrameTooLarge { len: payload.len() as u64, max: max_frame_len });
    }

    let header = FrameHeader { payload_len: payload.len() as u32 };
    let mut out = Vec::with_capacity(header.frame_len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

impl StreamTransform for FrameEncoder {
    fn name(&self) -> &'static str {
        "frame-encode"
    }

    // Empty input still yields a zero-length frame.
    fn transform(&mut self, input: &[u8]) -> Result<Option<Vec<u8>>, StreamError> {
        Ok(Some(encode_frame(input, self.max_frame_len)?))
    }

    fn finish(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        Ok(None)
    }
}
