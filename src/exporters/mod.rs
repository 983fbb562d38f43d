pub mod errors;
mod exporter;
pub mod writer;

pub use self::exporter::Export;
pub use self::writer::LineWriter;
