//! stream/input.rs
//! Decode path: pulls from the source through every decoder, one output unit
//! at a time.
//!
//! Pump order on every pull:
//! 1. release buffered output of the deepest stage that has some;
//! 2. otherwise read one buffer from the source into the first decoder;
//! 3. once the source is at EOF, finish the next unfinished decoder;
//! 4. when all decoders are finished and drained, the stream is exhausted.
//!
//! A pull stops as soon as the last decoder emits a unit, so one `read` never
//! spans two units. Units larger than `max_len` are served from a remainder.

use std::io::Read;

use bytes::{Buf, Bytes};
use tracing::{debug, trace, warn};

use crate::config::{ConfigError, StreamConfig};
use crate::stream::chain::{Flow, TransformChain};
use crate::stream::io::read_up_to;
use crate::stream::transform::StreamTransform;
use crate::telemetry::{TelemetryCounters, TelemetrySnapshot};
use crate::types::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Exhausted,
    Closed,
    Poisoned,
}

pub struct TransformingInputStream<R: Read> {
    chain: TransformChain,
    source: Option<R>,
    source_done: bool,
    remainder: Bytes,
    state: State,
    config: StreamConfig,
    counters: TelemetryCounters,
}

impl<R: Read> TransformingInputStream<R> {
    pub fn new(transforms: Vec<Box<dyn StreamTransform>>, source: R) -> Self {
        Self::open(transforms, source, StreamConfig::default())
    }

    pub fn with_config(
        transforms: Vec<Box<dyn StreamTransform>>,
        source: R,
        config: StreamConfig,
    ) -> Result<Self, StreamError> {
        config.validate()?;
        Ok(Self::open(transforms, source, config))
    }

    fn open(transforms: Vec<Box<dyn StreamTransform>>, source: R, config: StreamConfig) -> Self {
        let chain = TransformChain::new(transforms);
        debug!(stages = ?chain.names(), "input stream opened");
        Self {
            chain,
            source: Some(source),
            source_done: false,
            remainder: Bytes::new(),
            state: State::Open,
            config,
            counters: TelemetryCounters::default(),
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// False once the end has been reached (or the stream failed or closed).
    pub fn has_bytes_available(&self) -> bool {
        self.state == State::Open || !self.remainder.is_empty()
    }

    /// Up to `max_len` bytes of the current unit.
    ///
    /// Returns an empty vector for an explicitly written empty chunk and at
    /// the end of the stream.
    pub fn read(&mut self, max_len: usize) -> Result<Vec<u8>, StreamError> {
        // Caller misuse; the stream itself stays usable.
        if max_len == 0 {
            return Err(ConfigError::OutOfRange { field: "max_len", value: 0, min: 1, max: u64::MAX }.into());
        }

        if self.remainder.is_empty() {
            match self.next_unit()? {
                Some(unit) => self.remainder = Bytes::from(unit),
                None => return Ok(Vec::new()),
            }
        }

        let n = max_len.min(self.remainder.len());
        let out = self.remainder.split_to(n).to_vec();
        trace!(len = out.len(), left = self.remainder.len(), "read");
        Ok(out)
    }

    /// The rest of the current unit, or the next whole one; `None` at the end.
    pub fn read_chunk(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        if !self.remainder.is_empty() {
            let rest = self.remainder.split_to(self.remainder.remaining());
            return Ok(Some(rest.to_vec()));
        }
        self.next_unit()
    }

    /// Release transforms, spool files and the source. Idempotent.
    pub fn close(&mut self) -> Result<(), StreamError> {
        if self.state != State::Closed {
            self.chain.release();
            self.source = None;
            self.remainder = Bytes::new();
            self.state = State::Closed;
            debug!(units = self.counters.calls, bytes_out = self.counters.bytes_out, "input stream closed");
        }
        Ok(())
    }

    pub fn is_poisoned(&self) -> bool {
        self.state == State::Poisoned
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.chain.timer)
    }

    fn next_unit(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        match self.state {
            State::Open => {}
            State::Exhausted => return Ok(None),
            State::Closed => return Err(StreamError::Closed),
            State::Poisoned => return Err(StreamError::Poisoned),
        }
        let res = self.pump();
        self.poison_on_err(res)
    }

    fn pump(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        loop {
            let flow = if let Some(k) = self.chain.deepest_pending() {
                self.chain.drain_stage(k)?
            } else if !self.source_done {
                let source = self.source.as_mut().ok_or(StreamError::Closed)?;
                let buf = read_up_to(source, self.config.read_buffer_size)?;
                if buf.is_empty() {
                    self.source_done = true;
                    continue;
                }
                self.counters.add_input(buf.len());
                self.chain.push_from(0, &buf)?
            } else if let Some(flow) = self.chain.finish_next()? {
                flow
            } else {
                self.state = State::Exhausted;
                self.chain.release();
                self.source = None;
                debug!(units = self.counters.calls, bytes_in = self.counters.bytes_in, "input stream exhausted");
                return Ok(None);
            };

            if let Flow::Emitted(unit) = flow {
                self.counters.add_call();
                self.counters.add_output(unit.len());
                return Ok(Some(unit));
            }
        }
    }

    fn poison_on_err<T>(&mut self, res: Result<T, StreamError>) -> Result<T, StreamError> {
        if let Err(err) = &res {
            warn!(error = %err, kind = ?err.kind(), "input stream poisoned");
            self.state = State::Poisoned;
            self.remainder = Bytes::new();
            self.chain.release();
            self.source = None;
        }
        res
    }
}
