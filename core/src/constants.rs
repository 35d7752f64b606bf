/// Length prefix width of a chunk frame (u32, big-endian).
pub const FRAME_PREFIX_LEN: usize = 4;

/// Max frame payload sanity bound (32 MiB).
pub const MAX_FRAME_LEN: u32 = 32 * 1024 * 1024;

/// Defaults when a `StreamConfig` field is not set.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024; // 64 KiB
pub const DEFAULT_DRAIN_CHUNK_SIZE: usize = 64 * 1024; // 64 KiB
pub const DEFAULT_SPOOL_MEMORY_LIMIT: usize = 4 * 1024 * 1024; // 4 MiB
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Upper bound for read buffers and drain pieces (16 MiB).
pub const MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// Key material sizes.
pub const IV_LEN: usize = 16;
pub const ENCRYPTION_KEY_LEN: usize = 32;
pub const HMAC_KEY_LEN: usize = 32;

/// AES block size, also the PKCS#7 padding modulus.
pub const BLOCK_LEN: usize = 16;

/// HMAC-SHA256 tag appended to the end of the stream.
pub const TAG_LEN: usize = 32;

/// Stable codec IDs (u8) for configs and descriptors.
pub mod codec_ids {
    pub const GZIP: u8 = 0x01;
    pub const ZLIB: u8 = 0x02;
}
