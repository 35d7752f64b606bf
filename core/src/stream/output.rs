//! stream/output.rs
//! Encode path: caller writes go through every encoder into the sink.

use std::io::Write;

use tracing::{debug, trace, warn};

use crate::config::StreamConfig;
use crate::stream::chain::{Flow, TransformChain};
use crate::stream::transform::StreamTransform;
use crate::telemetry::{TelemetryCounters, TelemetrySnapshot};
use crate::types::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Closed,
    Poisoned,
}

/// Writes chunks through an ordered list of encoders.
///
/// Each `write` is one logical chunk and drives the whole chain before it
/// returns; whatever the last encoder emits is in the sink at that point.
/// `close` finishes the encoders in order and flushes the sink.
///
/// A failing call poisons the stream: the transforms are dropped, the error
/// is returned once, and later writes return [`StreamError::Poisoned`].
pub struct TransformingOutputStream<W: Write> {
    chain: TransformChain,
    sink: Option<W>,
    state: State,
    config: StreamConfig,
    counters: TelemetryCounters,
}

impl<W: Write> TransformingOutputStream<W> {
    pub fn new(transforms: Vec<Box<dyn StreamTransform>>, sink: W) -> Self {
        Self::open(transforms, sink, StreamConfig::default())
    }

    pub fn with_config(
        transforms: Vec<Box<dyn StreamTransform>>,
        sink: W,
        config: StreamConfig,
    ) -> Result<Self, StreamError> {
        config.validate()?;
        Ok(Self::open(transforms, sink, config))
    }

    fn open(transforms: Vec<Box<dyn StreamTransform>>, sink: W, config: StreamConfig) -> Self {
        let chain = TransformChain::new(transforms);
        debug!(stages = ?chain.names(), "output stream opened");
        Self {
            chain,
            sink: Some(sink),
            state: State::Open,
            config,
            counters: TelemetryCounters::default(),
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Encode one chunk. An empty slice is a chunk too.
    pub fn write(&mut self, data: &[u8]) -> Result<(), StreamError> {
        self.ensure_open()?;
        let res = self.write_chunk(data);
        self.poison_on_err(res)
    }

    /// Finish every encoder in order and flush the sink. Idempotent.
    pub fn close(&mut self) -> Result<(), StreamError> {
        match self.state {
            State::Closed => Ok(()),
            State::Poisoned => {
                // The failing call already reported the error.
                self.chain.release();
                self.sink = None;
                Ok(())
            }
            State::Open => {
                let res = self.finish_all();
                self.poison_on_err(res)?;
                self.state = State::Closed;
                self.chain.release();
                debug!(
                    calls = self.counters.calls,
                    bytes_in = self.counters.bytes_in,
                    bytes_out = self.counters.bytes_out,
                    "output stream closed"
                );
                Ok(())
            }
        }
    }

    /// Borrow the sink; `None` once released after a failure.
    pub fn sink(&self) -> Option<&W> {
        self.sink.as_ref()
    }

    /// Close (if still open) and hand back the sink.
    pub fn into_inner(mut self) -> Result<W, StreamError> {
        self.close()?;
        self.sink.take().ok_or(StreamError::Poisoned)
    }

    pub fn is_poisoned(&self) -> bool {
        self.state == State::Poisoned
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.chain.timer)
    }

    fn ensure_open(&self) -> Result<(), StreamError> {
        match self.state {
            State::Open => Ok(()),
            State::Closed => Err(StreamError::Closed),
            State::Poisoned => Err(StreamError::Poisoned),
        }
    }

    fn write_chunk(&mut self, data: &[u8]) -> Result<(), StreamError> {
        self.counters.add_call();
        self.counters.add_input(data.len());

        let flow = self.chain.push_from(0, data)?;
        self.emit(flow)?;
        self.drain()?;

        trace!(len = data.len(), "chunk written");
        Ok(())
    }

    fn finish_all(&mut self) -> Result<(), StreamError> {
        while let Some(flow) = self.chain.finish_next()? {
            self.emit(flow)?;
            self.drain()?;
        }
        debug_assert!(self.chain.is_finished());

        self.sink.as_mut().ok_or(StreamError::Poisoned)?.flush()?;
        Ok(())
    }

    fn drain(&mut self) -> Result<(), StreamError> {
        while let Some(k) = self.chain.deepest_pending() {
            let flow = self.chain.drain_stage(k)?;
            self.emit(flow)?;
        }
        Ok(())
    }

    fn emit(&mut self, flow: Flow) -> Result<(), StreamError> {
        let Flow::Emitted(bytes) = flow else {
            return Ok(());
        };
        if bytes.is_empty() {
            return Ok(());
        }
        self.sink.as_mut().ok_or(StreamError::Poisoned)?.write_all(&bytes)?;
        self.counters.add_output(bytes.len());
        Ok(())
    }

    fn poison_on_err<T>(&mut self, res: Result<T, StreamError>) -> Result<T, StreamError> {
        if let Err(err) = &res {
            warn!(error = %err, kind = ?err.kind(), "output stream poisoned");
            self.state = State::Poisoned;
            self.chain.release();
        }
        res
    }
}
