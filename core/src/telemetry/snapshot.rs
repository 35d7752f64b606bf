//! telemetry/snapshot.rs
//! Immutable telemetry snapshot of one stream.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub calls: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    /// `bytes_out / bytes_in`; 0.0 when nothing was written.
    pub size_ratio: f64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let size_ratio = if counters.bytes_in > 0 {
            counters.bytes_out as f64 / counters.bytes_in as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_in as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            calls: counters.calls,
            bytes_in: counters.bytes_in,
            bytes_out: counters.bytes_out,
            size_ratio,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    /// Stage time can never exceed the stream's lifetime.
    pub fn sanity_check(&self) -> bool {
        self.total_stage_time() <= self.elapsed
    }
}
