//! Bounded raw inflate shared by the deflate-family decoders.

use flate2::{Decompress, FlushDecompress, Status};

use crate::compression::types::CompressionError;

/// Progress of one bounded inflate call.
pub(crate) struct Inflated {
    pub consumed: usize,
    pub produced: usize,
    pub ended: bool,
}

/// Inflate from `input` into `out`, producing at most `budget` bytes.
pub(crate) fn inflate_bounded(
    inflater: &mut Decompress,
    input: &[u8],
    out: &mut Vec<u8>,
    budget: usize,
    codec: &'static str,
) -> Result<Inflated, CompressionError> {
    let start = out.len();
    out.resize(start + budget, 0);

    let mut done = Inflated { consumed: 0, produced: 0, ended: false };
    while done.produced < budget {
        let in_before = inflater.total_in();
        let out_before = inflater.total_out();
        let status = inflater
            .decompress(
                &input[done.consumed..],
                &mut out[start + done.produced..],
                FlushDecompress::None,
            )
            .map_err(|e| CompressionError::Process { codec, msg: e.to_string() })?;

        let consumed = (inflater.total_in() - in_before) as usize;
        let produced = (inflater.total_out() - out_before) as usize;
        done.consumed += consumed;
        done.produced += produced;

        if status == Status::StreamEnd {
            done.ended = true;
            break;
        }
        // No progress with output room left: the inflater needs more input.
        if consumed == 0 && produced == 0 {
            break;
        }
    }

    out.truncate(start + done.produced);
    Ok(done)
}
