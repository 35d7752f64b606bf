//! compression/registry.rs
//! Factory functions from codec to implementation.

use crate::compression::codecs::{gzip, zlib};
use crate::compression::types::{CompressionCodec, Compressor, Decompressor};

pub fn create_compressor(codec: CompressionCodec, level: u32) -> Box<dyn Compressor> {
    match codec {
        CompressionCodec::Gzip => Box::new(gzip::GzipCompressor::new(level)),
        CompressionCodec::Zlib => Box::new(zlib::ZlibCompressor::new(level)),
    }
}

pub fn create_decompressor(codec: CompressionCodec) -> Box<dyn Decompressor> {
    match codec {
        CompressionCodec::Gzip => Box::new(gzip::GzipDecompressor::new()),
        CompressionCodec::Zlib => Box::new(zlib::ZlibDecompressor::new()),
    }
}
