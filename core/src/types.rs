use std::io;

use crate::{
    compression::CompressionError,
    config::ConfigError,
    crypto::CryptoError,
    stream::framing::FrameError,
};

/// Coarse error taxonomy surfaced to callers (e.g. a retrying job layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid key/IV length or config value. Nothing was processed.
    Configuration,
    /// Malformed or truncated chunk frame.
    Framing,
    /// Malformed compressed data.
    Codec,
    /// Authentication failure; no plaintext of the affected data was released.
    Integrity,
    /// Sink/Source failure.
    Io,
    /// Misuse of a stream (after close, after failure).
    State,
}

/// Unified stream error covering I/O, framing, compression, crypto and config.
/// - Ergonomic `From<T>` impls enable `?` across the pipeline.
/// - `kind()` collapses the module errors into the caller-facing taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Sink or source I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Frame-level error (validation or parse).
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Compression/decompression error.
    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Cryptographic error (key lengths, authentication, padding).
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Invalid stream configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A previous call failed; the stream must be restarted from scratch.
    #[error("stream poisoned by an earlier failure")]
    Poisoned,

    /// The stream was already closed.
    #[error("stream closed")]
    Closed,

    /// A transform was driven out of order (e.g. input after finish).
    #[error("invalid transform state: {0}")]
    InvalidState(&'static str),
}

impl StreamError {
    /// Map onto the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::Io(_) => ErrorKind::Io,
            StreamError::Frame(_) => ErrorKind::Framing,
            StreamError::Compression(_) => ErrorKind::Codec,
            StreamError::Crypto(e) if e.is_configuration() => ErrorKind::Configuration,
            StreamError::Crypto(_) => ErrorKind::Integrity,
            StreamError::Config(_) => ErrorKind::Configuration,
            StreamError::Poisoned | StreamError::Closed | StreamError::InvalidState(_) => {
                ErrorKind::State
            }
        }
    }

    pub fn is_integrity(&self) -> bool {
        self.kind() == ErrorKind::Integrity
    }
}
