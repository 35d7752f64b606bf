//! Chunk framing for the transform pipeline.
//!
//! Responsibilities:
//! - Mark every caller `write()` as one self-delimiting frame
//! - Reassemble exactly one chunk per frame on decode, across any number of pulls
//!
//! Non-responsibilities:
//! - Cryptography
//! - Compression
//! - IO

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{FrameError, FrameHeader};
pub use encode::FrameEncoder;
pub use decode::FrameDecoder;
