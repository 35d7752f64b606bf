#[cfg(test)]
mod tests {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    use transform_core::config::StreamConfig;
    use transform_core::constants::{BLOCK_LEN, TAG_LEN};
    use transform_core::crypto::{CryptoError, DecryptingTransform, EncryptingTransform, KeyMaterial};
    use transform_core::stream::StreamTransform;
    use transform_core::{ErrorKind, StreamError};

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------
    fn fixed_keys() -> KeyMaterial {
        KeyMaterial::new(&[0x11; 16], &[0x22; 32], &[0x33; 32]).unwrap()
    }

    fn encrypt(keys: &KeyMaterial, data: &[u8], step: usize) -> Vec<u8> {
        let mut enc = EncryptingTransform::from_keys(keys).unwrap();
        let mut out = Vec::new();
        for piece in data.chunks(step) {
            if let Some(o) = enc.transform(piece).unwrap() {
                out.extend(o);
            }
        }
        out.extend(enc.finish().unwrap().unwrap());
        out
    }

    fn decrypt_with(
        mut dec: DecryptingTransform,
        wire: &[u8],
        step: usize,
    ) -> Result<Vec<u8>, StreamError> {
        let mut out = Vec::new();
        for piece in wire.chunks(step) {
            assert_eq!(dec.transform(piece)?, None, "no plaintext before verification");
        }
        if let Some(o) = dec.finish()? {
            out.extend(o);
        }
        while dec.has_pending_output() {
            if let Some(o) = dec.transform(&[])? {
                out.extend(o);
            }
        }
        Ok(out)
    }

    fn decrypt(keys: &KeyMaterial, wire: &[u8], step: usize) -> Result<Vec<u8>, StreamError> {
        let dec = DecryptingTransform::from_keys(keys, &StreamConfig::default()).unwrap();
        decrypt_with(dec, wire, step)
    }

    #[test]
    fn bad_key_lengths_fail_before_processing() {
        let err = KeyMaterial::new(&[0; 15], &[0; 32], &[0; 32]).unwrap_err();
        assert_eq!(err, CryptoError::InvalidKeyLen { what: "iv", expected: 16, actual: 15 });
        assert!(err.is_configuration());

        let err = EncryptingTransform::new(&[0; 16], &[0; 31], &[0; 32]).err().unwrap();
        assert!(matches!(err, CryptoError::InvalidKeyLen { what: "encryption key", .. }));

        let err = DecryptingTransform::new(&[0; 16], &[0; 32], &[]).err().unwrap();
        assert!(matches!(err, CryptoError::InvalidKeyLen { what: "hmac key", actual: 0, .. }));
        assert_eq!(StreamError::from(err).kind(), ErrorKind::Configuration);
    }

    #[test]
    fn generated_keys_are_distinct_and_redacted() {
        let a = KeyMaterial::generate();
        let b = KeyMaterial::generate();
        assert_ne!(a.encryption_key(), b.encryption_key());
        assert_ne!(a.hmac_key(), b.hmac_key());
        assert_eq!(format!("{a:?}"), "KeyMaterial { .. }");
    }

    #[test]
    fn output_is_padded_ciphertext_plus_tag() {
        let keys = fixed_keys();
        for len in [0usize, 1, 15, 16, 17, 100] {
            let wire = encrypt(&keys, &vec![0xAB; len], 7);
            let padded = (len / BLOCK_LEN + 1) * BLOCK_LEN;
            assert_eq!(wire.len(), padded + TAG_LEN, "len={len}");
        }
    }

    #[test]
    fn tag_covers_iv_and_ciphertext() {
        let keys = fixed_keys();
        let wire = encrypt(&keys, b"attachment body", 3);
        let (ct, tag) = wire.split_at(wire.len() - TAG_LEN);

        let mut mac = Hmac::<Sha256>::new_from_slice(keys.hmac_key()).unwrap();
        mac.update(keys.iv());
        mac.update(ct);
        mac.verify_slice(tag).unwrap();
    }

    #[test]
    fn roundtrip_with_any_fragmentation() {
        let keys = fixed_keys();
        let data: Vec<u8> = (0..5000u32).map(|i| (i * 7 % 256) as u8).collect();
        let wire = encrypt(&keys, &data, 1000);
        for step in [1, 13, 32, 33, wire.len()] {
            assert_eq!(decrypt(&keys, &wire, step).unwrap(), data, "step={step}");
        }
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let keys = fixed_keys();
        let wire = encrypt(&keys, &[], 1);
        assert_eq!(wire.len(), BLOCK_LEN + TAG_LEN);
        assert!(decrypt(&keys, &wire, 5).unwrap().is_empty());
    }

    #[test]
    fn plaintext_released_in_bounded_pieces() {
        let keys = fixed_keys();
        let data = vec![0x5Au8; 1000];
        let wire = encrypt(&keys, &data, 64);

        let config = StreamConfig { drain_chunk_size: 100, ..StreamConfig::default() };
        let mut dec = DecryptingTransform::from_keys(&keys, &config).unwrap();
        assert_eq!(dec.transform(&wire).unwrap(), None);

        let mut pieces = vec![dec.finish().unwrap().unwrap()];
        while dec.has_pending_output() {
            if let Some(p) = dec.transform(&[]).unwrap() {
                pieces.push(p);
            }
        }
        // 100 rounds down to 96 bytes per piece.
        assert!(pieces.iter().all(|p| p.len() <= 96));
        assert_eq!(pieces.concat(), data);
    }

    #[test]
    fn spool_spills_to_temp_file() {
        let keys = fixed_keys();
        let data = vec![1u8; 10_000];
        let wire = encrypt(&keys, &data, 4096);

        let config = StreamConfig { spool_memory_limit: 256, ..StreamConfig::default() };
        let mut dec = DecryptingTransform::from_keys(&keys, &config).unwrap();
        dec.transform(&wire[..1000]).unwrap();
        assert!(dec.is_spilled());
        dec.transform(&wire[1000..]).unwrap();
        assert_eq!(decrypt_with(dec, &[], 1).unwrap(), data);
    }

    #[test]
    fn every_flipped_byte_is_an_integrity_failure() {
        let keys = fixed_keys();
        let wire = encrypt(&keys, b"0123456789abcdef0123", 8);
        for i in 0..wire.len() {
            let mut bad = wire.clone();
            bad[i] ^= 0x01;
            let err = decrypt(&keys, &bad, 16).unwrap_err();
            assert!(matches!(err, StreamError::Crypto(CryptoError::TagMismatch)), "byte {i}: {err}");
            assert!(err.is_integrity());
        }
    }

    #[test]
    fn short_or_misframed_streams_fail_integrity() {
        let keys = fixed_keys();
        let wire = encrypt(&keys, b"abc", 8);

        let err = decrypt(&keys, &wire[..20], 4).unwrap_err();
        assert!(matches!(err, StreamError::Crypto(CryptoError::Truncated { have: 20, .. })));

        let err = decrypt(&keys, &wire[1..], 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);

        let err = decrypt(&keys, &[], 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
    }

    #[test]
    fn wrong_keys_are_rejected() {
        let wire = encrypt(&fixed_keys(), b"secret", 2);
        let err = decrypt(&KeyMaterial::generate(), &wire, 2).unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn input_after_finish_is_a_state_error() {
        let mut enc = EncryptingTransform::from_keys(&fixed_keys()).unwrap();
        enc.finish().unwrap();
        let err = enc.transform(b"late").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }
}
