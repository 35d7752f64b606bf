//! stream/chain.rs
//! Ordered transform list shared by the input and output streams.
//!
//! Invariants:
//! - Stages `[0, finished)` have been finished, in order. A stage is only
//!   finished once every earlier stage is finished and no stage holds
//!   pending output.
//! - Output of stage `k` is pushed through `k + 1..` before anything else runs,
//!   so causal order within one stream is strictly sequential.

use tracing::debug;

use crate::stream::transform::StreamTransform;
use crate::telemetry::TelemetryTimer;
use crate::types::StreamError;

/// Result of driving the chain one step.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    /// The last stage produced one output unit.
    Emitted(Vec<u8>),
    /// Work happened but the last stage produced nothing.
    Absorbed,
}

pub(crate) struct TransformChain {
    stages: Vec<Box<dyn StreamTransform>>,
    finished: usize,
    pub(crate) timer: TelemetryTimer,
}

impl TransformChain {
    pub(crate) fn new(stages: Vec<Box<dyn StreamTransform>>) -> Self {
        Self { stages, finished: 0, timer: TelemetryTimer::new() }
    }

    pub(crate) fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Feed `input` into stage `start` and every later stage.
    pub(crate) fn push_from(&mut self, start: usize, input: &[u8]) -> Result<Flow, StreamError> {
        if start >= self.stages.len() {
            // Empty chain (or the last stage emitted): input is the output.
            return Ok(Flow::Emitted(input.to_vec()));
        }

        let stage = &mut self.stages[start];
        let name = stage.name();
        let out = self.timer.time(name, || stage.transform(input))?;
        self.forward(start, out)
    }

    /// Deepest stage still holding releasable output.
    pub(crate) fn deepest_pending(&self) -> Option<usize> {
        self.stages.iter().rposition(|s| s.has_pending_output())
    }

    /// Release buffered output of stage `k` into the rest of the chain.
    pub(crate) fn drain_stage(&mut self, k: usize) -> Result<Flow, StreamError> {
        self.push_from(k, &[])
    }

    /// Finish the next unfinished stage, or `None` when all are finished.
    pub(crate) fn finish_next(&mut self) -> Result<Option<Flow>, StreamError> {
        let Some(stage) = self.stages.get_mut(self.finished) else {
            return Ok(None);
        };

        let k = self.finished;
        let name = stage.name();
        let out = self.timer.time(name, || stage.finish())?;
        self.finished += 1;
        debug!(stage = name, index = k, "transform finished");

        self.forward(k, out).map(Some)
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished == self.stages.len()
    }

    /// Drop every transform (and whatever it holds, e.g. a spool file).
    /// Stage timings survive for telemetry.
    pub(crate) fn release(&mut self) {
        self.stages.clear();
        self.finished = 0;
    }

    fn forward(&mut self, k: usize, out: Option<Vec<u8>>) -> Result<Flow, StreamError> {
        match out {
            None => Ok(Flow::Absorbed),
            Some(bytes) if k + 1 == self.stages.len() => Ok(Flow::Emitted(bytes)),
            Some(bytes) => self.push_from(k + 1, &bytes),
        }
    }
}
