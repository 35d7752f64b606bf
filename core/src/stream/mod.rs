//! Streaming layer: transform contract, chain driver, framing, sources and
//! sinks, and the two orchestrating streams.

pub mod transform;
pub(crate) mod chain;
pub mod framing;
pub mod spool;
pub mod io;
pub mod output;
pub mod input;
pub mod pipeline;

pub use transform::StreamTransform;
pub use io::{open_input, open_output, InputSource, OutputSink, SharedBuffer};
pub use output::TransformingOutputStream;
pub use input::TransformingInputStream;
pub use pipeline::{Pipeline, Stage};
