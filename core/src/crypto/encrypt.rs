//! crypto/encrypt.rs
//! Streaming AES-256-CBC encryption with a running HMAC-SHA256.

use cbc::cipher::{generic_array::GenericArray, BlockEncryptMut, KeyIvInit};
use hmac::Mac;
use tracing::trace;

use crate::constants::{BLOCK_LEN, ENCRYPTION_KEY_LEN, HMAC_KEY_LEN};
use crate::crypto::keys::KeyMaterial;
use crate::crypto::padding::pad;
use crate::crypto::types::{Aes256CbcEnc, CryptoError, HmacSha256};
use crate::stream::transform::StreamTransform;
use crate::types::StreamError;

pub struct EncryptingTransform {
    cipher: Aes256CbcEnc,
    /// `None` once the tag has been emitted.
    mac: Option<HmacSha256>,
    /// Plaintext not yet forming a whole block (< BLOCK_LEN bytes).
    partial: Vec<u8>,
}

impl EncryptingTransform {
    /// Validates all three lengths before anything else happens.
    pub fn new(iv: &[u8], encryption_key: &[u8], hmac_key: &[u8]) -> Result<Self, CryptoError> {
        Self::from_keys(&KeyMaterial::new(iv, encryption_key, hmac_key)?)
    }

    pub fn from_keys(keys: &KeyMaterial) -> Result<Self, CryptoError> {
        let cipher = Aes256CbcEnc::new_from_slices(keys.encryption_key(), keys.iv()).map_err(|_| {
            CryptoError::InvalidKeyLen {
                what: "encryption key",
                expected: ENCRYPTION_KEY_LEN,
                actual: keys.encryption_key().len(),
            }
        })?;
        let mut mac = HmacSha256::new_from_slice(keys.hmac_key()).map_err(|_| {
            CryptoError::InvalidKeyLen {
                what: "hmac key",
                expected: HMAC_KEY_LEN,
                actual: keys.hmac_key().len(),
            }
        })?;
        // Bind the IV into the tag; it never travels on the wire.
        mac.update(keys.iv());

        Ok(Self { cipher, mac: Some(mac), partial: Vec::with_capacity(BLOCK_LEN) })
    }

    /// Encrypt whole blocks in place and feed the ciphertext to the MAC.
    fn seal_blocks(&mut self, buf: &mut [u8]) -> Result<(), StreamError> {
        debug_assert_eq!(buf.len() % BLOCK_LEN, 0);
        let mac = self.mac.as_mut().ok_or(StreamError::InvalidState("encrypt after finish"))?;
        for block in buf.chunks_exact_mut(BLOCK_LEN) {
            self.cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        mac.update(buf);
        Ok(())
    }
}

impl StreamTransform for EncryptingTransform {
    fn name(&self) -> &'static str {
        "encrypt"
    }

    fn transform(&mut self, input: &[u8]) -> Result<Option<Vec<u8>>, StreamError> {
        if self.mac.is_none() {
            return Err(StreamError::InvalidState("encrypt after finish"));
        }

        let mut buf = std::mem::take(&mut self.partial);
        buf.extend_from_slice(input);
        let keep = buf.len() % BLOCK_LEN;
        self.partial = buf.split_off(buf.len() - keep);

        if buf.is_empty() {
            return Ok(None);
        }
        self.seal_blocks(&mut buf)?;
        Ok(Some(buf))
    }

    fn finish(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        let mut last = std::mem::take(&mut self.partial);
        pad(&mut last);
        self.seal_blocks(&mut last)?;

        let mac = self.mac.take().ok_or(StreamError::InvalidState("encrypt finished twice"))?;
        let tag = mac.finalize().into_bytes();
        last.extend_from_slice(&tag);

        trace!(trailer_len = last.len(), "encryption finished, tag appended");
        Ok(Some(last))
    }
}
