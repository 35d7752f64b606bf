//! telemetry/counters.rs
//! Mutable counters used while a stream is open.
//!
//! Converted into an immutable `TelemetrySnapshot` on request.

use serde::{Deserialize, Serialize};

/// Deterministic counters collected during stream processing.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    /// `write` calls (encode) or produced units (decode).
    pub calls: u64,
    /// Bytes handed to the first transform.
    pub bytes_in: u64,
    /// Bytes emitted by the last transform.
    pub bytes_out: u64,
}

impl TelemetryCounters {
    pub fn add_input(&mut self, len: usize) {
        self.bytes_in += len as u64;
    }

    pub fn add_output(&mut self, len: usize) {
        self.bytes_out += len as u64;
    }

    pub fn add_call(&mut self) {
        self.calls += 1;
    }
}
