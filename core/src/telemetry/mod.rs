//! telemetry/mod.rs
//! Per-stream counters, per-stage timers, and immutable snapshots.
//!
//! Notes:
//! - Counters are owned by one stream; nothing here is shared or atomic.
//! - Snapshots are plain serde data so callers can log or persist them.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
