//! crypto/mod.rs
//! Authenticated symmetric encryption stage.
//!
//! Construction: AES-256-CBC with PKCS#7 padding, then HMAC-SHA256 over
//! `iv || ciphertext` (encrypt-then-MAC). The 32-byte tag trails the stream.

pub mod types;
pub mod keys;
pub mod padding;
pub mod encrypt;
pub mod decrypt;

pub use types::*;
pub use keys::KeyMaterial;
pub use encrypt::EncryptingTransform;
pub use decrypt::DecryptingTransform;
