use hmac::Hmac;
use sha2::Sha256;

pub(crate) type HmacSha256 = Hmac<Sha256>;
pub(crate) type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
pub(crate) type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Key material of the wrong size; raised before any byte is processed.
    #[error("invalid {what} length: expected={expected}, actual={actual}")]
    InvalidKeyLen {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// HMAC tag mismatch (authentication failure).
    #[error("authentication tag mismatch")]
    TagMismatch,

    /// Stream too short to hold one cipher block and the tag.
    #[error("encrypted stream truncated: {have} bytes, need at least {min}")]
    Truncated { have: u64, min: u64 },

    /// Authenticated ciphertext that is not a whole number of blocks.
    #[error("ciphertext length {len} is not a multiple of the block size")]
    Misaligned { len: u64 },

    #[error("invalid block padding")]
    BadPadding,
}

impl CryptoError {
    /// Configuration problems (as opposed to integrity failures on input data).
    pub fn is_configuration(&self) -> bool {
        matches!(self, CryptoError::InvalidKeyLen { .. })
    }
}
