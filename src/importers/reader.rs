use core::fmt;
use std::io::{BufRead, Lines, Read};

use log::debug;

use super::{errors::ImporterError, import::Import};

/// Reads the whole input as a single flow log document.
pub struct DocumentReader<R> {
    reader: Option<R>,
}

impl<R: Read> DocumentReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

impl<R> fmt::Debug for DocumentReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DocumentReader {{ consumed: {} }}", self.reader.is_none())
    }
}

impl<R: Read> Import for DocumentReader<R> {
    fn import(&mut self) -> Result<Option<String>, ImporterError> {
        let mut reader = match self.reader.take() {
            Some(r) => r,
            None => return Ok(None),
        };

        let mut document = String::new();
        reader.read_to_string(&mut document)?;
        debug!("read document of {} bytes", document.len());

        Ok(Some(document))
    }
}

/// Reads one flow log document per line, blank lines are skipped.
pub struct LineReader<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R> fmt::Debug for LineReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LineReader {{ line_number: {} }}", self.line_number)
    }
}

impl<R: BufRead> Import for LineReader<R> {
    fn import(&mut self) -> Result<Option<String>, ImporterError> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_number += 1;

            if line.trim().is_empty() {
                debug!("skipping blank line {}", self.line_number);
                continue;
            }
            return Ok(Some(line));
        }

        Ok(None)
    }
}
