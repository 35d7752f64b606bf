//! crypto/decrypt.rs
//! Verify-then-decrypt for the AES-256-CBC + HMAC-SHA256 stream.
//!
//! Design notes:
//! - The last TAG_LEN bytes seen are held back as the candidate tag; all
//!   earlier bytes are ciphertext, MACed and spooled as they arrive.
//! - Nothing is decrypted before `finish` has verified the tag over the whole
//!   ciphertext, so no unauthenticated plaintext can reach the consumer.
//! - After verification the spool is decrypted in bounded pieces released via
//!   `has_pending_output` / `transform(&[])`.

use cbc::cipher::{generic_array::GenericArray, BlockDecryptMut, KeyIvInit};
use hmac::Mac;
use tracing::debug;

use crate::config::StreamConfig;
use crate::constants::{BLOCK_LEN, ENCRYPTION_KEY_LEN, HMAC_KEY_LEN, TAG_LEN};
use crate::crypto::keys::KeyMaterial;
use crate::crypto::padding::unpadded_len;
use crate::crypto::types::{Aes256CbcDec, CryptoError, HmacSha256};
use crate::stream::spool::Spool;
use crate::stream::transform::{non_empty, StreamTransform};
use crate::types::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecryptState {
    Absorbing,
    Draining { remaining: u64 },
    Done,
}

pub struct DecryptingTransform {
    cipher: Aes256CbcDec,
    mac: Option<HmacSha256>,
    tail: Vec<u8>,
    spool: Spool,
    ciphertext_len: u64,
    piece_len: usize,
    state: DecryptState,
}

impl DecryptingTransform {
    /// Validates all three lengths before anything else happens.
    pub fn new(iv: &[u8], encryption_key: &[u8], hmac_key: &[u8]) -> Result<Self, CryptoError> {
        Self::from_keys(&KeyMaterial::new(iv, encryption_key, hmac_key)?, &StreamConfig::default())
    }

    pub fn from_keys(keys: &KeyMaterial, config: &StreamConfig) -> Result<Self, CryptoError> {
        let cipher = Aes256CbcDec::new_from_slices(keys.encryption_key(), keys.iv()).map_err(|_| {
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
        mac.update(keys.iv());

        Ok(Self {
            cipher,
            mac: Some(mac),
            tail: Vec::with_capacity(2 * TAG_LEN),
            spool: Spool::new(config.spool_memory_limit),
            ciphertext_len: 0,
            piece_len: (config.drain_chunk_size / BLOCK_LEN).max(1) * BLOCK_LEN,
            state: DecryptState::Absorbing,
        })
    }

    /// True once the spool moved to a temp file.
    pub fn is_spilled(&self) -> bool {
        self.spool.is_spilled()
    }

    /// Bytes known to be ciphertext (i.e. not part of the candidate tag).
    fn absorb(&mut self, ciphertext: &[u8]) -> Result<(), StreamError> {
        if ciphertext.is_empty() {
            return Ok(());
        }
        let mac = self.mac.as_mut().ok_or(StreamError::InvalidState("decrypt after finish"))?;
        mac.update(ciphertext);
        self.spool.write_all(ciphertext)?;
        self.ciphertext_len += ciphertext.len() as u64;
        Ok(())
    }

    fn verify(&mut self) -> Result<(), StreamError> {
        let mac = self.mac.take().ok_or(StreamError::InvalidState("decrypt finished twice"))?;

        let have = self.ciphertext_len + self.tail.len() as u64;
        if self.tail.len() < TAG_LEN {
            return Err(CryptoError::Truncated { have, min: (BLOCK_LEN + TAG_LEN) as u64 }.into());
        }
        mac.verify_slice(&self.tail).map_err(|_| CryptoError::TagMismatch)?;

        if self.ciphertext_len == 0 || self.ciphertext_len % BLOCK_LEN as u64 != 0 {
            return Err(CryptoError::Misaligned { len: self.ciphertext_len }.into());
        }
        Ok(())
    }

    /// Decrypt the next piece of authenticated ciphertext.
    fn drain_piece(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        let DecryptState::Draining { remaining } = self.state else {
            return Ok(None);
        };

        let take = remaining.min(self.piece_len as u64) as usize;
        let mut buf = self.spool.read_exact_len(take)?;
        for block in buf.chunks_exact_mut(BLOCK_LEN) {
            self.cipher.decrypt_block_mut(GenericArray::from_mut_slice(block));
        }

        let remaining = remaining - take as u64;
        if remaining == 0 {
            let len = unpadded_len(&buf)?;
            buf.truncate(len);
            self.state = DecryptState::Done;
            self.spool.release();
            return Ok(non_empty(buf));
        }
        self.state = DecryptState::Draining { remaining };
        Ok(Some(buf))
    }
}

impl StreamTransform for DecryptingTransform {
    fn name(&self) -> &'static str {
        "decrypt"
    }

    fn transform(&mut self, input: &[u8]) -> Result<Option<Vec<u8>>, StreamError> {
        match self.state {
            DecryptState::Absorbing => {}
            _ if !input.is_empty() => return Err(StreamError::InvalidState("decrypt after finish")),
            DecryptState::Draining { .. } => return self.drain_piece(),
            DecryptState::Done => return Ok(None),
        }

        if input.len() >= TAG_LEN {
            let split = input.len() - TAG_LEN;
            let held = std::mem::take(&mut self.tail);
            self.absorb(&held)?;
            self.absorb(&input[..split])?;
            self.tail.extend_from_slice(&input[split..]);
        } else {
            self.tail.extend_from_slice(input);
            if self.tail.len() > TAG_LEN {
                let excess = self.tail.len() - TAG_LEN;
                let head: Vec<u8> = self.tail.drain(..excess).collect();
                self.absorb(&head)?;
            }
        }
        Ok(None)
    }

    fn finish(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        if self.state != DecryptState::Absorbing {
            return Err(StreamError::InvalidState("decrypt finished twice"));
        }

        self.verify()?;
        self.spool.rewind()?;
        debug!(
            ciphertext_len = self.ciphertext_len,
            spilled = self.spool.is_spilled(),
            "authentication tag verified"
        );

        self.state = DecryptState::Draining { remaining: self.ciphertext_len };
        self.drain_piece()
    }

    fn has_pending_output(&self) -> bool {
        matches!(self.state, DecryptState::Draining { .. })
    }
}
