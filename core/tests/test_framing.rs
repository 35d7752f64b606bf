#[cfg(test)]
mod tests {
    use transform_core::stream::framing::encode::encode_frame;
    use transform_core::stream::framing::{FrameDecoder, FrameEncoder, FrameError, FrameHeader};
    use transform_core::stream::StreamTransform;
    use transform_core::{ErrorKind, StreamError};

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------
    fn decode_in_steps(wire: &[u8], step: usize) -> Result<Vec<Vec<u8>>, StreamError> {
        let mut dec = FrameDecoder::new(1024);
        let mut chunks = Vec::new();
        for piece in wire.chunks(step) {
            if let Some(c) = dec.transform(piece)? {
                chunks.push(c);
            }
            while dec.has_pending_output() {
                if let Some(c) = dec.transform(&[])? {
                    chunks.push(c);
                }
            }
        }
        if let Some(c) = dec.finish()? {
            chunks.push(c);
        }
        Ok(chunks)
    }

    fn wire_of(chunks: &[&[u8]]) -> Vec<u8> {
        let mut enc = FrameEncoder::new(1024);
        let mut wire = Vec::new();
        for c in chunks {
            wire.extend(enc.transform(c).unwrap().unwrap());
        }
        assert_eq!(enc.finish().unwrap(), None);
        wire
    }

    #[test]
    fn prefix_is_u32_big_endian() {
        let frame = encode_frame(b"abc", 1024).unwrap();
        assert_eq!(frame, [0, 0, 0, 3, b'a', b'b', b'c']);

        let header = FrameHeader::parse(&frame).unwrap();
        assert_eq!(header.payload_len, 3);
        assert_eq!(header.frame_len(), 7);
        assert_eq!(FrameHeader::parse(&frame[..3]), None);
    }

    #[test]
    fn empty_write_is_a_zero_length_frame() {
        let mut enc = FrameEncoder::new(16);
        assert_eq!(enc.transform(&[]).unwrap(), Some(vec![0, 0, 0, 0]));
    }

    #[test]
    fn chunks_survive_any_fragmentation() {
        let chunks: [&[u8]; 4] = [b"w", b"", b"xx", b"yyy"];
        let wire = wire_of(&chunks);

        for step in [1, 2, 3, 5, 7, wire.len()] {
            let decoded = decode_in_steps(&wire, step).unwrap();
            assert_eq!(decoded, chunks.iter().map(|c| c.to_vec()).collect::<Vec<_>>(), "step={step}");
        }
    }

    #[test]
    fn oversized_payload_rejected_on_encode() {
        let mut enc = FrameEncoder::new(4);
        let err = enc.transform(b"12345").unwrap_err();
        assert!(matches!(err, StreamError::Frame(FrameError::FrameTooLarge { len: 5, max: 4 })));
        assert_eq!(err.kind(), ErrorKind::Framing);
    }

    #[test]
    fn oversized_prefix_rejected_on_decode() {
        let mut dec = FrameDecoder::new(4);
        let err = dec.transform(&[0, 0, 1, 0]).unwrap_err();
        assert!(matches!(err, StreamError::Frame(FrameError::FrameTooLarge { len: 256, max: 4 })));
    }

    #[test]
    fn truncated_payload_detected_at_finish() {
        let wire = wire_of(&[b"hello"]);
        let err = decode_in_steps(&wire[..wire.len() - 1], 2).unwrap_err();
        assert!(matches!(err, StreamError::Frame(FrameError::Truncated { have: 8, need: 9 })));
    }

    #[test]
    fn truncated_prefix_detected_at_finish() {
        let err = decode_in_steps(&[0, 0], 1).unwrap_err();
        assert!(matches!(err, StreamError::Frame(FrameError::Truncated { have: 2, need: 4 })));
    }
}
