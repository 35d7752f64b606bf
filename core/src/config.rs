//! config.rs
//! Per-stream tuning knobs with validated defaults.
//!
//! A config is plain data: it is copied into each stream and transform at
//! construction, never shared between operations.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COMPRESSION_LEVEL, DEFAULT_DRAIN_CHUNK_SIZE, DEFAULT_READ_BUFFER_SIZE,
    DEFAULT_SPOOL_MEMORY_LIMIT, MAX_BUFFER_SIZE, MAX_FRAME_LEN,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} out of range: {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("unknown compression codec id: 0x{0:02x}")]
    UnknownCodec(u8),

    #[error("invalid config document: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Bytes pulled from the source per underlying read.
    pub read_buffer_size: usize,

    /// Largest chunk frame accepted on encode and decode.
    pub max_frame_len: u32,

    /// Deflate level, 0 (store) to 9 (best).
    pub compression_level: u32,

    /// Ciphertext kept in memory before the decrypt spool moves to a temp file.
    pub spool_memory_limit: usize,

    /// Largest piece released at once by the decrypt and decompress stages.
    pub drain_chunk_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            max_frame_len: MAX_FRAME_LEN,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            spool_memory_limit: DEFAULT_SPOOL_MEMORY_LIMIT,
            drain_chunk_size: DEFAULT_DRAIN_CHUNK_SIZE,
        }
    }
}

impl StreamConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        let config: StreamConfig =
            serde_json::from_str(doc).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("read_buffer_size", self.read_buffer_size as u64, 1, MAX_BUFFER_SIZE as u64)?;
        check_range("max_frame_len", self.max_frame_len as u64, 1, MAX_FRAME_LEN as u64)?;
        check_range("compression_level", self.compression_level as u64, 0, 9)?;
        check_range("spool_memory_limit", self.spool_memory_limit as u64, 0, u32::MAX as u64)?;
        check_range("drain_chunk_size", self.drain_chunk_size as u64, 16, MAX_BUFFER_SIZE as u64)?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange { field, value, min, max });
    }
    Ok(())
}
