//! Output destination of a writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::util::{Error, Result};

/// Output stream that tracks how many bytes went out.
///
/// The destination is held until [`OStream::into_inner`] hands it back, which
/// happens exactly once at finalization.
pub struct OStream<W: Write> {
    writer: Option<W>,
    pos: u64,
}

impl OStream<BufWriter<File>> {
    /// Create (or truncate) a file for writing.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self::new(BufWriter::with_capacity(1024 * 1024, file)))
    }
}

impl<W: Write> OStream<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Some(writer), pos: 0 }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Write bytes and advance position.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::Closed)?;
        writer.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    /// Write one header line, appending the line break.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_bytes(line.as_bytes())?;
        self.write_bytes(b"\n")
    }

    pub fn flush(&mut self) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(Error::Closed)?;
        writer.flush()?;
        Ok(())
    }

    /// Flush and release the destination.
    pub fn into_inner(&mut self) -> Result<W> {
        self.flush()?;
        self.writer.take().ok_or(Error::Closed)
    }

    /// Release the destination without writing anything more.
    pub fn discard(&mut self) -> Option<W> {
        self.writer.take()
    }
}
