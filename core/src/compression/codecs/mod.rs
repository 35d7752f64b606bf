//! compression/codecs/mod.rs
//! flate2-backed codecs.

pub(crate) mod inflate;
pub mod gzip;
pub mod zlib;

pub use gzip::*;
pub use zlib::*;
