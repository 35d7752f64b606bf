//! compression/stream.rs
//! `StreamTransform` adapters over the codec traits.

use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::compression::registry::{create_compressor, create_decompressor};
use crate::compression::types::{CompressionCodec, Compressor, Decompressor};
use crate::constants::DEFAULT_DRAIN_CHUNK_SIZE;
use crate::stream::transform::{non_empty, StreamTransform};
use crate::types::StreamError;

/// Encode side of the compression stage.
pub struct CompressTransform {
    codec: CompressionCodec,
    inner: Box<dyn Compressor>,
}

impl CompressTransform {
    pub fn new(codec: CompressionCodec, level: u32) -> Self {
        Self { codec, inner: create_compressor(codec, level) }
    }
}

impl StreamTransform for CompressTransform {
    fn name(&self) -> &'static str {
        match self.codec {
            CompressionCodec::Gzip => "gzip-compress",
            CompressionCodec::Zlib => "zlib-compress",
        }
    }

    fn transform(&mut self, input: &[u8]) -> Result<Option<Vec<u8>>, StreamError> {
        let mut out = Vec::new();
        self.inner.compress_chunk(input, &mut out)?;
        Ok(non_empty(out))
    }

    fn finish(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        let mut out = Vec::new();
        self.inner.finish(&mut out)?;
        trace!(codec = self.codec.name(), trailer_len = out.len(), "compressor finished");
        Ok(non_empty(out))
    }
}

/// Decode side of the compression stage.
///
/// Each call releases at most `max_output` bytes. Input the codec has not
/// consumed yet stays here, and `has_pending_output` asks the chain to pull
/// the rest with `transform(&[])`.
pub struct DecompressTransform {
    codec: CompressionCodec,
    inner: Box<dyn Decompressor>,
    input: BytesMut,
    max_output: usize,
    more: bool,
}

impl DecompressTransform {
    pub fn new(codec: CompressionCodec) -> Self {
        Self::with_output_limit(codec, DEFAULT_DRAIN_CHUNK_SIZE)
    }

    pub fn with_output_limit(codec: CompressionCodec, max_output: usize) -> Self {
        Self {
            codec,
            inner: create_decompressor(codec),
            input: BytesMut::new(),
            max_output: max_output.max(1),
            more: false,
        }
    }
}

impl StreamTransform for DecompressTransform {
    fn name(&self) -> &'static str {
        match self.codec {
            CompressionCodec::Gzip => "gzip-decompress",
            CompressionCodec::Zlib => "zlib-decompress",
        }
    }

    fn transform(&mut self, input: &[u8]) -> Result<Option<Vec<u8>>, StreamError> {
        self.input.extend_from_slice(input);

        let mut out = Vec::new();
        let consumed = self.inner.decompress_chunk(&self.input, &mut out, self.max_output)?;
        self.input.advance(consumed);
        // A full budget means the codec may hold more output.
        self.more = out.len() == self.max_output;
        Ok(non_empty(out))
    }

    fn finish(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        self.inner.finish(&self.input)?;
        self.input.clear();
        Ok(None)
    }

    fn has_pending_output(&self) -> bool {
        self.more
    }
}
