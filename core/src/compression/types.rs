//! compression/types.rs
//! Codec identifiers, errors, and the codec traits.

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::constants::codec_ids;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    Gzip = codec_ids::GZIP,
    Zlib = codec_ids::ZLIB,
}

impl Default for CompressionCodec {
    fn default() -> Self {
        CompressionCodec::Gzip
    }
}

impl CompressionCodec {
    pub fn from_id(raw: u8) -> Result<Self, ConfigError> {
        Self::try_from_primitive(raw).map_err(|_| ConfigError::UnknownCodec(raw))
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            CompressionCodec::Gzip => "gzip",
            CompressionCodec::Zlib => "zlib",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CompressionError {
    #[error("codec {codec} process failed: {msg}")]
    Process { codec: &'static str, msg: String },

    #[error("codec {codec}: data after end of compressed stream")]
    TrailingData { codec: &'static str },

    #[error("codec {codec}: compressed stream ended early")]
    Truncated { codec: &'static str },

    #[error("codec {codec}: used after finish")]
    Finished { codec: &'static str },

    #[error("codec {codec}: invalid stream header")]
    BadHeader { codec: &'static str },

    #[error("codec {codec}: trailer checksum mismatch")]
    Checksum { codec: &'static str },
}

impl CompressionError {
    pub(crate) fn process(codec: &'static str) -> impl Fn(std::io::Error) -> Self {
        move |e| CompressionError::Process { codec, msg: e.to_string() }
    }
}

// Require Send so trait objects can move with their stream.
pub trait Compressor: Send {
    /// Compress the next piece of the stream, appending whatever is ready to `out`.
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
    /// Emit the final block and trailer.
    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError>;
}

pub trait Decompressor: Send {
    /// Decompress from the front of `input`, appending at most `budget` bytes to `out`.
    ///
    /// Returns how many input bytes were consumed. Unconsumed bytes (an
    /// incomplete header or trailer, or input left over once the budget is
    /// spent) must be offered again on the next call.
    fn decompress_chunk(
        &mut self,
        input: &[u8],
        out: &mut Vec<u8>,
        budget: usize,
    ) -> Result<usize, CompressionError>;

    /// Check the stream ended cleanly; `rest` is input never consumed.
    fn finish(&mut self, rest: &[u8]) -> Result<(), CompressionError>;
}
