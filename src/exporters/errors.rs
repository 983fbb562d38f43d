use std::io;

#[derive(Debug)]
pub enum ExporterError {
    WriteErr(io::Error),
}

impl PartialEq for ExporterError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::WriteErr(a), Self::WriteErr(b)) => a.kind() == b.kind(),
        }
    }
}

impl From<io::Error> for ExporterError {
    fn from(error: io::Error) -> Self {
        Self::WriteErr(error)
    }
}
