use core::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};

use serde::Deserialize;

use crate::exporters::{Export, LineWriter};
use crate::extractor::ProtocolTable;
use crate::importers::{DocumentReader, Import, LineReader};
use crate::renderer::Schema;

#[derive(Debug)]
pub enum ConstructorErr {
    ImporterErr(io::Error),
    ExporterErr(io::Error),
    MissingSetting(String),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub enum ImporterVariants {
    #[default]
    #[serde(rename = "document")]
    Document,
    #[serde(rename = "lines")]
    Lines,
}

impl ImporterVariants {
    /// Reads from `settings.path`, standard input when no path is set.
    pub fn construct_importer(
        &self,
        settings: &ImporterSettings,
    ) -> Result<Box<dyn Import>, ConstructorErr> {
        match &settings.path {
            Some(path) => {
                let file = File::open(path).map_err(ConstructorErr::ImporterErr)?;
                Ok(self.wrap(BufReader::new(file)))
            }
            None => Ok(self.wrap(BufReader::new(io::stdin()))),
        }
    }

    fn wrap<R: io::BufRead + 'static>(&self, reader: R) -> Box<dyn Import> {
        match *self {
            Self::Document => Box::new(DocumentReader::new(reader)),
            Self::Lines => Box::new(LineReader::new(reader)),
        }
    }
}

impl From<ImporterVariants> for String {
    fn from(variant: ImporterVariants) -> Self {
        variant.to_string()
    }
}

impl fmt::Display for ImporterVariants {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Document => "document",
            Self::Lines => "lines",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Importer {
    #[serde(default)]
    pub source: ImporterVariants,
    #[serde(default)]
    pub settings: ImporterSettings,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ImporterSettings {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub enum ExporterVariants {
    #[default]
    #[serde(rename = "stdout")]
    Stdout,
    #[serde(rename = "file")]
    File,
}

impl ExporterVariants {
    pub fn construct_exporter(
        &self,
        settings: &ExporterSettings,
    ) -> Result<Box<dyn Export>, ConstructorErr> {
        match *self {
            Self::Stdout => Ok(Box::new(LineWriter::new(BufWriter::new(io::stdout())))),
            Self::File => {
                let path = settings.path.as_ref().ok_or_else(|| {
                    ConstructorErr::MissingSetting("exporter.settings.path".to_string())
                })?;
                let file = File::create(path).map_err(ConstructorErr::ExporterErr)?;
                Ok(Box::new(LineWriter::new(BufWriter::new(file))))
            }
        }
    }
}

impl From<ExporterVariants> for String {
    fn from(variant: ExporterVariants) -> Self {
        variant.to_string()
    }
}

impl fmt::Display for ExporterVariants {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Stdout => "stdout",
            Self::File => "file",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Exporter {
    #[serde(default)]
    pub destination: ExporterVariants,
    #[serde(default)]
    pub settings: ExporterSettings,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ExporterSettings {
    pub path: Option<String>,
}

/// What happens with the run when a record can not be converted.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// log the record and carry on
    #[default]
    Skip,
    Abort,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    #[serde(default)]
    pub schema: Schema,

    #[serde(default)]
    pub protocols: ProtocolTable,

    #[serde(default)]
    pub importer: Importer,

    #[serde(default)]
    pub exporter: Exporter,

    #[serde(default)]
    pub on_error: ErrorPolicy,
}
