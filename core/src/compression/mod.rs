//! compression/mod.rs
//! Streaming deflate-family compression and decompression.
//!
//! Notes:
//! - One compressor instance covers the whole stream; input granularity is free.
//! - Decoders accept compressed bytes in fragments of any size and release
//!   output in bounded pieces.
//! - Registry maps a codec to its implementation.

pub mod types;
pub mod registry;
pub mod codecs;
pub mod stream;

pub use types::*;
pub use registry::*;
pub use stream::{CompressTransform, DecompressTransform};
