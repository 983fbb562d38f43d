use super::errors::ExporterError;

/// Destination of rendered lines.
pub trait Export {
    /// Writes a single rendered line, the exporter terminates it.
    fn export(&mut self, line: &str) -> Result<(), ExporterError>;

    fn flush(&mut self) -> Result<(), ExporterError> {
        Ok(())
    }
}
