use clap::Parser;
use log::info;
use std::path::PathBuf;

use crate::application_state::CONFIG_PATH;
use crate::settings::{Configuration, ErrorPolicy, ExporterVariants, ImporterVariants};

/// Converts flow log records into space delimited plain text lines
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Input file, standard input when omitted
    pub input: Option<PathBuf>,

    /// Output file, standard output when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Treat every input line as a separate record
    #[arg(long)]
    pub lines: bool,

    /// Abort on the first record that can not be converted
    #[arg(long)]
    pub fail_fast: bool,

    #[arg(short, long, default_value = CONFIG_PATH)]
    pub config: String,
}

impl Args {
    /// Flags take precedence over the configuration file and the environment.
    pub fn apply(&self, config: &mut Configuration) {
        if let Some(input) = &self.input {
            config.importer.settings.path = Some(input.to_string_lossy().to_string());
        }

        if self.lines {
            config.importer.source = ImporterVariants::Lines;
        }

        if let Some(output) = &self.output {
            config.exporter.destination = ExporterVariants::File;
            config.exporter.settings.path = Some(output.to_string_lossy().to_string());
        }

        if self.fail_fast {
            config.on_error = ErrorPolicy::Abort;
        }

        info!(
            "reading {} from {}, writing to {}",
            config.importer.source,
            config
                .importer
                .settings
                .path
                .as_deref()
                .unwrap_or("stdin"),
            config
                .exporter
                .settings
                .path
                .as_deref()
                .unwrap_or("stdout"),
        );
    }
}
