use std::io;

#[derive(Debug)]
pub enum ImporterError {
    ReadErr(io::Error),
}

impl PartialEq for ImporterError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ReadErr(a), Self::ReadErr(b)) => a.kind() == b.kind(),
        }
    }
}

impl From<io::Error> for ImporterError {
    fn from(error: io::Error) -> Self {
        Self::ReadErr(error)
    }
}
