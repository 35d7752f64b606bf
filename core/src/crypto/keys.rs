//! crypto/keys.rs
//! Fixed-size key material for one stream.
//!
//! Callers generate and durably associate these with the stream's record;
//! this crate treats them as opaque inputs.

use std::fmt;

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{ENCRYPTION_KEY_LEN, HMAC_KEY_LEN, IV_LEN};
use crate::crypto::types::CryptoError;

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    iv: [u8; IV_LEN],
    encryption_key: [u8; ENCRYPTION_KEY_LEN],
    hmac_key: [u8; HMAC_KEY_LEN],
}

impl KeyMaterial {
    /// Validate exact lengths and copy the material.
    pub fn new(iv: &[u8], encryption_key: &[u8], hmac_key: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            iv: fixed("iv", iv)?,
            encryption_key: fixed("encryption key", encryption_key)?,
            hmac_key: fixed("hmac key", hmac_key)?,
        })
    }

    /// Fresh random material from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut keys = Self {
            iv: [0u8; IV_LEN],
            encryption_key: [0u8; ENCRYPTION_KEY_LEN],
            hmac_key: [0u8; HMAC_KEY_LEN],
        };
        rng.fill_bytes(&mut keys.iv);
        rng.fill_bytes(&mut keys.encryption_key);
        rng.fill_bytes(&mut keys.hmac_key);
        keys
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    pub fn encryption_key(&self) -> &[u8; ENCRYPTION_KEY_LEN] {
        &self.encryption_key
    }

    pub fn hmac_key(&self) -> &[u8; HMAC_KEY_LEN] {
        &self.hmac_key
    }
}

fn fixed<const N: usize>(what: &'static str, bytes: &[u8]) -> Result<[u8; N], CryptoError> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidKeyLen { what, expected: N, actual: bytes.len() })
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial").finish_non_exhaustive()
    }
}
