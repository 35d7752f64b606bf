//! stream/transform.rs
//! One direction of a reversible streaming stage.
//!
//! Contract (driven by `TransformChain`):
//! - `transform` may be called any number of times with input of any size.
//! - `finish` is called exactly once, after the last input. It emits trailer
//!   bytes (compressor trailers, padding, tags).
//! - While `has_pending_output` is true the chain calls `transform(&[])` to
//!   release buffered output, also after `finish`.
//! - Returning `Ok(None)` means "nothing produced yet". `Ok(Some(v))` is one
//!   output unit; `v` may be empty when the unit itself is empty (an explicitly
//!   written zero-length chunk).

use crate::types::StreamError;

pub trait StreamTransform: Send {
    /// Stable name used in logs and stage timers.
    fn name(&self) -> &'static str;

    fn transform(&mut self, input: &[u8]) -> Result<Option<Vec<u8>>, StreamError>;

    fn finish(&mut self) -> Result<Option<Vec<u8>>, StreamError>;

    fn has_pending_output(&self) -> bool {
        false
    }
}

impl std::fmt::Debug for dyn StreamTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte-oriented stages report "nothing yet" instead of an empty unit.
#[inline]
pub(crate) fn non_empty(out: Vec<u8>) -> Option<Vec<u8>> {
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
