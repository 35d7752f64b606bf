//! Gzip: flate2 writer for encode. Decode parses the member header and
//! trailer here and inflates the body with a raw `Decompress`, so output can
//! be bounded per call.
//!
//! Member layout (RFC 1952):
//!
//! ```text
//! [ 1f 8b | CM=8 | FLG | MTIME(4) | XFL | OS ]
//! [ FEXTRA: XLEN(2, LE) + data ] [ FNAME\0 ] [ FCOMMENT\0 ] [ FHCRC(2) ]
//! [ deflate body ]
//! [ CRC32(4, LE) | ISIZE(4, LE) ]
//! ```

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian};
use flate2::{write::GzEncoder, Compression, Crc, Decompress};

use crate::compression::codecs::inflate::inflate_bounded;
use crate::compression::types::{CompressionError, Compressor, Decompressor};

const CODEC: &str = "gzip";

const MAGIC: [u8; 2] = [0x1f, 0x8b];
const FIXED_HEADER_LEN: usize = 10;
const TRAILER_LEN: usize = 8;

const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;
const FRESERVED: u8 = 0xe0;

pub struct GzipCompressor {
    enc: Option<GzEncoder<Vec<u8>>>,
}

impl GzipCompressor {
    pub fn new(level: u32) -> Self {
        Self { enc: Some(GzEncoder::new(Vec::new(), Compression::new(level.min(9)))) }
    }
}

impl Compressor for GzipCompressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let enc = self.enc.as_mut().ok_or(CompressionError::Finished { codec: CODEC })?;
        enc.write_all(input).map_err(CompressionError::process(CODEC))?;
        // Take what the encoder has produced so far; it keeps appending to the empty Vec.
        out.append(enc.get_mut());
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let enc = self.enc.take().ok_or(CompressionError::Finished { codec: CODEC })?;
        let tail = enc.finish().map_err(CompressionError::process(CODEC))?;
        out.extend_from_slice(&tail);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
    Header,
    Body,
    Trailer,
    Done,
}

pub struct GzipDecompressor {
    member: Member,
    inflater: Decompress,
    crc: Crc,
    finished: bool,
}

impl Default for GzipDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl GzipDecompressor {
    pub fn new() -> Self {
        Self {
            member: Member::Header,
            inflater: Decompress::new(false),
            crc: Crc::new(),
            finished: false,
        }
    }

    fn check_trailer(&self, trailer: &[u8]) -> Result<(), CompressionError> {
        let crc = LittleEndian::read_u32(&trailer[..4]);
        let isize = LittleEndian::read_u32(&trailer[4..TRAILER_LEN]);
        if crc != self.crc.sum() || isize != self.crc.amount() {
            return Err(CompressionError::Checksum { codec: CODEC });
        }
        Ok(())
    }
}

/// Length of a complete member header at the front of `buf`, `None` if more
/// bytes are needed.
fn header_len(buf: &[u8]) -> Result<Option<usize>, CompressionError> {
    if buf.iter().zip(MAGIC).any(|(&have, want)| have != want) {
        return Err(CompressionError::BadHeader { codec: CODEC });
    }
    if buf.len() < FIXED_HEADER_LEN {
        return Ok(None);
    }
    let flags = buf[3];
    if buf[2] != 8 || flags & FRESERVED != 0 {
        return Err(CompressionError::BadHeader { codec: CODEC });
    }

    let mut pos = FIXED_HEADER_LEN;
    if flags & FEXTRA != 0 {
        if buf.len() < pos + 2 {
            return Ok(None);
        }
        pos += 2 + LittleEndian::read_u16(&buf[pos..pos + 2]) as usize;
    }
    for flag in [FNAME, FCOMMENT] {
        if flags & flag != 0 {
            match buf.get(pos..).and_then(|rest| rest.iter().position(|&b| b == 0)) {
                Some(nul) => pos += nul + 1,
                None => return Ok(None),
            }
        }
    }
    if flags & FHCRC != 0 {
        pos += 2;
    }
    Ok((buf.len() >= pos).then_some(pos))
}

impl Decompressor for GzipDecompressor {
    fn decompress_chunk(
        &mut self,
        input: &[u8],
        out: &mut Vec<u8>,
        budget: usize,
    ) -> Result<usize, CompressionError> {
        if self.finished {
            return Err(CompressionError::Finished { codec: CODEC });
        }

        let start = out.len();
        let mut pos = 0;
        loop {
            match self.member {
                Member::Header => match header_len(&input[pos..])? {
                    Some(n) => {
                        pos += n;
                        self.member = Member::Body;
                    }
                    None => return Ok(pos),
                },
                Member::Body => {
                    let room = budget - (out.len() - start);
                    if room == 0 {
                        return Ok(pos);
                    }
                    let before = out.len();
                    let step = inflate_bounded(&mut self.inflater, &input[pos..], out, room, CODEC)?;
                    self.crc.update(&out[before..]);
                    pos += step.consumed;
                    if !step.ended {
                        return Ok(pos);
                    }
                    self.member = Member::Trailer;
                }
                Member::Trailer => {
                    if input.len() - pos < TRAILER_LEN {
                        return Ok(pos);
                    }
                    self.check_trailer(&input[pos..pos + TRAILER_LEN])?;
                    pos += TRAILER_LEN;
                    self.member = Member::Done;
                }
                Member::Done => {
                    if pos < input.len() {
                        return Err(CompressionError::TrailingData { codec: CODEC });
                    }
                    return Ok(pos);
                }
            }
        }
    }

    fn finish(&mut self, rest: &[u8]) -> Result<(), CompressionError> {
        if self.finished {
            return Err(CompressionError::Finished { codec: CODEC });
        }
        self.finished = true;
        match self.member {
            Member::Done if rest.is_empty() => Ok(()),
            Member::Done => Err(CompressionError::TrailingData { codec: CODEC }),
            _ => Err(CompressionError::Truncated { codec: CODEC }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_needs_all_optional_fields() {
        // FNAME set, name not yet terminated.
        let mut hdr = vec![0x1f, 0x8b, 8, FNAME, 0, 0, 0, 0, 0, 255, b'a', b'b'];
        assert_eq!(header_len(&hdr), Ok(None));
        hdr.push(0);
        assert_eq!(header_len(&hdr), Ok(Some(13)));
        assert_eq!(header_len(&[0x1f]), Ok(None));
        assert_eq!(header_len(&[0x1f, 0x00]), Err(CompressionError::BadHeader { codec: CODEC }));
    }
}
