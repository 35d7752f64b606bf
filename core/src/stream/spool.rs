//! stream/spool.rs
//! Append-then-replay byte store that moves to an anonymous temp file once it
//! outgrows its memory budget.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use tracing::debug;

enum Backing {
    Memory(Cursor<Vec<u8>>),
    File(File),
}

pub struct Spool {
    backing: Backing,
    len: u64,
    memory_limit: usize,
}

impl Spool {
    pub fn new(memory_limit: usize) -> Self {
        Self { backing: Backing::Memory(Cursor::new(Vec::new())), len: 0, memory_limit }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_spilled(&self) -> bool {
        matches!(self.backing, Backing::File(_))
    }

    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        if let Backing::Memory(cur) = &self.backing {
            if cur.get_ref().len() + data.len() > self.memory_limit {
                self.spill()?;
            }
        }

        match &mut self.backing {
            Backing::Memory(cur) => cur.get_mut().extend_from_slice(data),
            Backing::File(file) => file.write_all(data)?,
        }
        self.len += data.len() as u64;
        Ok(())
    }

    /// Switch to reading from the start.
    pub fn rewind(&mut self) -> io::Result<()> {
        match &mut self.backing {
            Backing::Memory(cur) => cur.set_position(0),
            Backing::File(file) => {
                file.flush()?;
                file.seek(SeekFrom::Start(0))?;
            }
        }
        Ok(())
    }

    pub fn read_exact_len(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        match &mut self.backing {
            Backing::Memory(cur) => cur.read_exact(&mut buf)?,
            Backing::File(file) => file.read_exact(&mut buf)?,
        }
        Ok(buf)
    }

    /// Drop the contents (and the temp file, which the OS then reclaims).
    pub fn release(&mut self) {
        self.backing = Backing::Memory(Cursor::new(Vec::new()));
        self.len = 0;
    }

    fn spill(&mut self) -> io::Result<()> {
        let mut file = tempfile::tempfile()?;
        if let Backing::Memory(cur) = &self.backing {
            file.write_all(cur.get_ref())?;
        }
        debug!(buffered = self.len, limit = self.memory_limit, "spool spilled to temp file");
        self.backing = Backing::File(file);
        Ok(())
    }
}
