//! stream/pipeline.rs
//! One ordered stage list from which both directions are derived.

use std::io::{Read, Write};

use crate::compression::{CompressTransform, CompressionCodec, DecompressTransform};
use crate::config::StreamConfig;
use crate::crypto::{DecryptingTransform, EncryptingTransform, KeyMaterial};
use crate::stream::framing::{FrameDecoder, FrameEncoder};
use crate::stream::input::TransformingInputStream;
use crate::stream::output::TransformingOutputStream;
use crate::stream::transform::StreamTransform;
use crate::types::StreamError;

/// A reversible unit. Each stage yields a fresh encoder and decoder.
#[derive(Debug, Clone)]
pub enum Stage {
    ChunkFraming,
    Compression(CompressionCodec),
    Encryption(KeyMaterial),
}

impl Stage {
    pub fn encoder(&self, config: &StreamConfig) -> Result<Box<dyn StreamTransform>, StreamError> {
        let transform: Box<dyn StreamTransform> = match self {
            Stage::ChunkFraming => Box::new(FrameEncoder::new(config.max_frame_len)),
            Stage::Compression(codec) => {
                Box::new(CompressTransform::new(*codec, config.compression_level))
            }
            Stage::Encryption(keys) => Box::new(EncryptingTransform::from_keys(keys)?),
        };
        Ok(transform)
    }

    pub fn decoder(&self, config: &StreamConfig) -> Result<Box<dyn StreamTransform>, StreamError> {
        let transform: Box<dyn StreamTransform> = match self {
            Stage::ChunkFraming => Box::new(FrameDecoder::new(config.max_frame_len)),
            Stage::Compression(codec) => {
                Box::new(DecompressTransform::with_output_limit(*codec, config.drain_chunk_size))
            }
            Stage::Encryption(keys) => Box::new(DecryptingTransform::from_keys(keys, config)?),
        };
        Ok(transform)
    }
}

/// Ordered stages plus the config every derived transform is built with.
///
/// Encoders run in list order; decoders run in reverse, so a pipeline always
/// decodes what it encoded.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
    config: StreamConfig,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages, config: StreamConfig::default() }
    }

    pub fn with_config(stages: Vec<Stage>, config: StreamConfig) -> Result<Self, StreamError> {
        config.validate()?;
        Ok(Self { stages, config })
    }

    /// Attachment storage layout: framing, gzip, then encryption.
    pub fn attachment(keys: KeyMaterial) -> Self {
        Self::new(vec![
            Stage::ChunkFraming,
            Stage::Compression(CompressionCodec::Gzip),
            Stage::Encryption(keys),
        ])
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn encoders(&self) -> Result<Vec<Box<dyn StreamTransform>>, StreamError> {
        self.stages.iter().map(|s| s.encoder(&self.config)).collect()
    }

    pub fn decoders(&self) -> Result<Vec<Box<dyn StreamTransform>>, StreamError> {
        self.stages.iter().rev().map(|s| s.decoder(&self.config)).collect()
    }

    pub fn output_stream<W: Write>(&self, sink: W) -> Result<TransformingOutputStream<W>, StreamError> {
        TransformingOutputStream::with_config(self.encoders()?, sink, self.config.clone())
    }

    pub fn input_stream<R: Read>(&self, source: R) -> Result<TransformingInputStream<R>, StreamError> {
        TransformingInputStream::with_config(self.decoders()?, source, self.config.clone())
    }
}
