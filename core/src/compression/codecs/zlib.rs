//! Zlib: flate2 writer for encode, raw `Decompress` state for decode so the
//! end of the zlib stream is observed explicitly.

use std::io::Write;

use flate2::{write::ZlibEncoder, Compression, Decompress};

use crate::compression::codecs::inflate::inflate_bounded;
use crate::compression::types::{CompressionError, Compressor, Decompressor};

const CODEC: &str = "zlib";

pub struct ZlibCompressor {
    enc: Option<ZlibEncoder<Vec<u8>>>,
}

impl ZlibCompressor {
    pub fn new(level: u32) -> Self {
        Self { enc: Some(ZlibEncoder::new(Vec::new(), Compression::new(level.min(9)))) }
    }
}

impl Compressor for ZlibCompressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let enc = self.enc.as_mut().ok_or(CompressionError::Finished { codec: CODEC })?;
        enc.write_all(input).map_err(CompressionError::process(CODEC))?;
        out.append(enc.get_mut());
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let enc = self.enc.take().ok_or(CompressionError::Finished { codec: CODEC })?;
        let tail = enc.finish().map_err(CompressionError::process(CODEC))?;
        out.extend_from_slice(&tail);
        Ok(())
    }
}

pub struct ZlibDecompressor {
    // Header and Adler-32 are checked by the inflater itself.
    inflater: Decompress,
    ended: bool,
    finished: bool,
}

impl Default for ZlibDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl ZlibDecompressor {
    pub fn new() -> Self {
        Self { inflater: Decompress::new(true), ended: false, finished: false }
    }
}

impl Decompressor for ZlibDecompressor {
    fn decompress_chunk(
        &mut self,
        input: &[u8],
        out: &mut Vec<u8>,
        budget: usize,
    ) -> Result<usize, CompressionError> {
        if self.finished {
            return Err(CompressionError::Finished { codec: CODEC });
        }

        let mut consumed = 0;
        if !self.ended {
            let step = inflate_bounded(&mut self.inflater, input, out, budget, CODEC)?;
            consumed = step.consumed;
            self.ended = step.ended;
        }
        if self.ended && consumed < input.len() {
            return Err(CompressionError::TrailingData { codec: CODEC });
        }
        Ok(consumed)
    }

    fn finish(&mut self, rest: &[u8]) -> Result<(), CompressionError> {
        if self.finished {
            return Err(CompressionError::Finished { codec: CODEC });
        }
        self.finished = true;
        if !self.ended {
            return Err(CompressionError::Truncated { codec: CODEC });
        }
        if !rest.is_empty() {
            return Err(CompressionError::TrailingData { codec: CODEC });
        }
        Ok(())
    }
}
