//! transform-core
//!
//! Composable streaming transforms for large payloads: chunk framing,
//! deflate-family compression and AES-256-CBC + HMAC-SHA256 encryption,
//! driven by a writer-side and a reader-side stream.
//! Pure Rust, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod config;

// Stages
pub mod compression;
pub mod crypto;
pub mod telemetry;

// Stream layer
pub mod stream;

pub use config::{ConfigError, StreamConfig};
pub use types::{ErrorKind, StreamError};

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::CompressionCodec;
    pub use crate::config::StreamConfig;
    pub use crate::crypto::KeyMaterial;
    pub use crate::stream::{
        InputSource, OutputSink, Pipeline, SharedBuffer, Stage, StreamTransform,
        TransformingInputStream, TransformingOutputStream,
    };
    pub use crate::types::{ErrorKind, StreamError};
}
