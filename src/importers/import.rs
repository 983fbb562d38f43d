use super::errors::ImporterError;

/// Source of raw flow log documents.
pub trait Import {
    /// Next raw document, `None` once the source is exhausted.
    fn import(&mut self) -> Result<Option<String>, ImporterError>;
}
