use core::fmt;
use std::io::Write;

use log::debug;

use super::{errors::ExporterError, exporter::Export};

/// Writes every rendered line followed by a newline.
pub struct LineWriter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }
}

impl<W: Write> fmt::Debug for LineWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LineWriter {{ written: {} }}", self.written)
    }
}

impl<W: Write> Export for LineWriter<W> {
    fn export(&mut self, line: &str) -> Result<(), ExporterError> {
        writeln!(self.writer, "{}", line)?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ExporterError> {
        self.writer.flush()?;
        debug!("flushed after {} lines", self.written);
        Ok(())
    }
}
