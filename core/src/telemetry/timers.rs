//! telemetry/timers.rs
//! Wall-clock timers for transform stages.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Accumulated time per transform, keyed by `StreamTransform::name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    times: BTreeMap<String, Duration>,
}

impl StageTimes {
    /// Add duration to a stage (accumulates if already present).
    pub fn add(&mut self, stage: &str, dur: Duration) {
        *self.times.entry(stage.to_owned()).or_insert(Duration::ZERO) += dur;
    }

    /// Total duration for a stage; zero if it never ran.
    pub fn get(&self, stage: &str) -> Duration {
        self.times.get(stage).copied().unwrap_or(Duration::ZERO)
    }

    /// Sum all stage durations.
    pub fn total(&self) -> Duration {
        self.times.values().copied().sum()
    }

    pub fn stages(&self) -> impl Iterator<Item = &str> {
        self.times.keys().map(String::as_str)
    }
}

/// Stream-lifetime timer plus per-stage accumulation.
#[derive(Debug, Clone)]
pub struct TelemetryTimer {
    start: Instant,
    pub stage_times: StageTimes,
}

impl Default for TelemetryTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryTimer {
    pub fn new() -> Self {
        Self { start: Instant::now(), stage_times: StageTimes::default() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Run `f`, charging its wall time to `stage`.
    pub fn time<T>(&mut self, stage: &str, f: impl FnOnce() -> T) -> T {
        let begin = Instant::now();
        let out = f();
        self.stage_times.add(stage, begin.elapsed());
        out
    }
}
