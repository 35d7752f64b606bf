//! PKCS#7 block padding.

use crate::constants::BLOCK_LEN;
use crate::crypto::types::CryptoError;

/// Append 1..=BLOCK_LEN padding bytes so `buf` becomes block-aligned.
pub fn pad(buf: &mut Vec<u8>) {
    let n = BLOCK_LEN - buf.len() % BLOCK_LEN;
    buf.resize(buf.len() + n, n as u8);
}

/// Length of `buf` without its padding.
pub fn unpadded_len(buf: &[u8]) -> Result<usize, CryptoError> {
    let Some(&last) = buf.last() else {
        return Err(CryptoError::BadPadding);
    };
    let n = last as usize;
    if n == 0 || n > BLOCK_LEN || n > buf.len() {
        return Err(CryptoError::BadPadding);
    }
    if buf[buf.len() - n..].iter().any(|&b| b != last) {
        return Err(CryptoError::BadPadding);
    }
    Ok(buf.len() - n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_input_gets_a_full_block() {
        let mut buf = vec![7u8; BLOCK_LEN];
        pad(&mut buf);
        assert_eq!(buf.len(), 2 * BLOCK_LEN);
        assert_eq!(unpadded_len(&buf), Ok(BLOCK_LEN));
    }

    #[test]
    fn inconsistent_padding_is_rejected() {
        let mut buf = vec![0u8; BLOCK_LEN];
        buf[BLOCK_LEN - 1] = 3;
        buf[BLOCK_LEN - 2] = 3;
        buf[BLOCK_LEN - 3] = 9;
        assert_eq!(unpadded_len(&buf), Err(CryptoError::BadPadding));
        assert_eq!(unpadded_len(&[0u8; BLOCK_LEN]), Err(CryptoError::BadPadding));
    }
}
