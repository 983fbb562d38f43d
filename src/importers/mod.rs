pub mod errors;
mod import;
pub mod reader;

pub use self::import::Import;
pub use self::reader::{DocumentReader, LineReader};
