//! stream/io.rs
//! Normalized sources and sinks for the transforming streams.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::types::StreamError;

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    /// Captured in memory; keep a clone of the buffer to read it back.
    Memory(SharedBuffer),
}

/// Normalize input source into a boxed reader
pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, StreamError> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => Box::new(std::fs::File::open(p)?),
        InputSource::Memory(b) => Box::new(io::Cursor::new(b)),
    };
    Ok(reader)
}

/// Normalize output sink into a boxed writer
pub fn open_output(sink: OutputSink) -> Result<Box<dyn Write + Send>, StreamError> {
    let writer: Box<dyn Write + Send> = match sink {
        OutputSink::Writer(w) => w,
        OutputSink::File(p) => Box::new(std::fs::File::create(p)?),
        OutputSink::Memory(buf) => Box::new(buf),
    };
    Ok(writer)
}

/// Cloneable in-memory sink; every clone appends to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> io::Result<Vec<u8>> {
        Ok(self.lock()?.clone())
    }

    pub fn take(&self) -> io::Result<Vec<u8>> {
        Ok(std::mem::take(&mut *self.lock()?))
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Vec<u8>>> {
        self.buf.lock().map_err(|_| io::Error::new(io::ErrorKind::Other, "shared buffer poisoned"))
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.lock()?.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One underlying read of at most `len` bytes; empty means EOF.
///
/// Interrupted reads are retried. Short reads are returned as-is so a slow
/// source never blocks a pull that could already make progress.
pub fn read_up_to<R: Read + ?Sized>(r: &mut R, len: usize) -> Result<Vec<u8>, StreamError> {
    let mut buf = vec![0u8; len];
    loop {
        match r.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                return Ok(buf);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
