use log::{debug, error, info};

use crate::config::{ConfigCache, ConfigErr};
use crate::converter::Converter;
use crate::errors::ConvertError;
use crate::exporters::errors::ExporterError;
use crate::exporters::Export;
use crate::importers::errors::ImporterError;
use crate::importers::Import;
use crate::settings::{Configuration, ConstructorErr, ErrorPolicy};

pub const CONFIG_PATH: &str = "./flowlog.yaml";

pub struct ApplicationState {
    pub config: ConfigCache,
}

#[derive(Debug)]
pub enum AppInitErr {
    Config(ConfigErr),
    Constructor(ConstructorErr),
}

#[derive(Debug)]
pub enum RunErr {
    Import(ImporterError),
    Export(ExporterError),
    Aborted(ConvertError),
}

impl From<ImporterError> for RunErr {
    fn from(error: ImporterError) -> Self {
        Self::Import(error)
    }
}

impl From<ExporterError> for RunErr {
    fn from(error: ExporterError) -> Self {
        Self::Export(error)
    }
}

/// Outcome of a conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub converted: usize,
    /// empty records, nothing was written for them
    pub skipped: usize,
    pub failed: usize,
}

pub struct Components {
    pub converter: Converter,
    pub importer: Box<dyn Import>,
    pub exporter: Box<dyn Export>,
    pub on_error: ErrorPolicy,
}

impl ApplicationState {
    pub fn new(config_cache: ConfigCache) -> Self {
        Self {
            config: config_cache,
        }
    }

    pub fn config(&self) -> Result<Configuration, AppInitErr> {
        self.config
            .get_config::<Configuration>()
            .map_err(AppInitErr::Config)
    }

    pub fn init_components(config: Configuration) -> Result<Components, AppInitErr> {
        let importer = config
            .importer
            .source
            .construct_importer(&config.importer.settings)
            .map_err(AppInitErr::Constructor)?;

        let exporter = config
            .exporter
            .destination
            .construct_exporter(&config.exporter.settings)
            .map_err(AppInitErr::Constructor)?;

        let converter = Converter::new(config.schema, config.protocols);
        info!(
            "using schema [{}] with {} known protocols",
            converter.schema(),
            converter.protocols().len()
        );

        Ok(Components {
            converter,
            importer,
            exporter,
            on_error: config.on_error,
        })
    }
}

impl Components {
    pub fn run(mut self) -> Result<RunSummary, RunErr> {
        run(
            &self.converter,
            self.importer.as_mut(),
            self.exporter.as_mut(),
            self.on_error,
        )
    }
}

/// Pulls every document out of `importer`, converts it and hands the line to `exporter`.
///
/// A record that can not be converted is either logged and counted or ends the run,
/// depending on `on_error`. Import and export failures always end the run.
pub fn run(
    converter: &Converter,
    importer: &mut dyn Import,
    exporter: &mut dyn Export,
    on_error: ErrorPolicy,
) -> Result<RunSummary, RunErr> {
    let mut summary = RunSummary::default();

    while let Some(document) = importer.import()? {
        let record = summary.converted + summary.skipped + summary.failed + 1;

        match converter.convert_str(&document) {
            Ok(line) if line.is_empty() => {
                debug!("record {} is empty, skipping", record);
                summary.skipped += 1;
            }
            Ok(line) => {
                exporter.export(&line)?;
                summary.converted += 1;
            }
            Err(e) => {
                error!("unable to convert record {}: {}", record, e);
                summary.failed += 1;

                if on_error == ErrorPolicy::Abort {
                    exporter.flush()?;
                    return Err(RunErr::Aborted(e));
                }
            }
        }
    }

    exporter.flush()?;
    info!(
        "converted: {}, skipped: {}, failed: {}",
        summary.converted, summary.skipped, summary.failed
    );

    Ok(summary)
}

pub fn init_config(path: &str) -> Result<ApplicationState, AppInitErr> {
    let config_cache = ConfigCache::new(path).map_err(AppInitErr::Config)?;

    if config_cache.file_found() {
        info!("configuration loaded from [{}]", config_cache.path().display());
    }

    Ok(ApplicationState::new(config_cache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CompositeField, InputFormatError};
    use crate::settings::ExporterVariants;
    use mockall::{mock, Sequence};
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::io::{self, Write};

    type ImportResult = Result<Option<String>, ImporterError>;
    type ExportResult = Result<(), ExporterError>;

    mock! {
        pub Source { }

        impl Import for Source {
            fn import(&mut self) -> ImportResult;
        }
    }

    mock! {
        pub Sink { }

        impl Export for Sink {
            fn export(&mut self, line: &str) -> ExportResult;
            fn flush(&mut self) -> ExportResult;
        }
    }

    const VALID: &str = r#"{"direction":"O","action":"accepted","transport_protocol":6,"key":"a/account=ACCT/b/c/subnet=z%3As","instance_crn":"crn:v1:a/b::instance:i-1"}"#;
    const SHORT_KEY: &str = r#"{"key":"a/account=ACCT","instance_crn":"crn:v1:a/b::instance:i-1"}"#;

    fn source(documents: Vec<&str>) -> MockSource {
        let mut source = MockSource::new();
        let mut seq = Sequence::new();

        for document in documents {
            let document = document.to_string();
            source
                .expect_import()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move || Ok(Some(document.clone())));
        }
        source
            .expect_import()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(None));

        source
    }

    fn converter() -> Converter {
        Converter::new(
            "direction action protocol account_id subnet_id instance_id state"
                .parse()
                .unwrap(),
            Default::default(),
        )
    }

    #[test]
    fn test_run_exports_converted_lines() {
        let mut source = source(vec![VALID, "", "{}", VALID]);
        let mut sink = MockSink::new();
        sink.expect_export()
            .withf(|line| line == "O accepted TCP ACCT s i-1 Null ")
            .times(2)
            .returning(|_| Ok(()));
        sink.expect_flush().times(1).returning(|| Ok(()));

        let summary = run(&converter(), &mut source, &mut sink, ErrorPolicy::Skip).unwrap();

        assert_eq!(
            RunSummary {
                converted: 2,
                skipped: 2,
                failed: 0
            },
            summary
        );
    }

    #[test]
    fn test_run_skips_failed_record() {
        let mut source = source(vec![SHORT_KEY, VALID]);
        let mut sink = MockSink::new();
        sink.expect_export().times(1).returning(|_| Ok(()));
        sink.expect_flush().times(1).returning(|| Ok(()));

        let summary = run(&converter(), &mut source, &mut sink, ErrorPolicy::Skip).unwrap();

        assert_eq!(
            RunSummary {
                converted: 1,
                skipped: 0,
                failed: 1
            },
            summary
        );
    }

    #[test]
    fn test_run_aborts_on_failed_record() {
        let mut source = MockSource::new();
        source
            .expect_import()
            .times(1)
            .returning(|| Ok(Some(SHORT_KEY.to_string())));
        let mut sink = MockSink::new();
        sink.expect_export().never();
        sink.expect_flush().times(1).returning(|| Ok(()));

        let result = run(&converter(), &mut source, &mut sink, ErrorPolicy::Abort);

        match result {
            Err(RunErr::Aborted(e)) => assert_eq!(
                ConvertError::InputFormat(InputFormatError::MissingSegment {
                    field: CompositeField::Key,
                    segment: 4
                }),
                e
            ),
            other => panic!("expected aborted run, got {:?}", other),
        }
    }

    #[test]
    fn test_run_stops_on_import_error() {
        let mut source = MockSource::new();
        source.expect_import().times(1).returning(|| {
            Err(ImporterError::ReadErr(io::Error::from(
                io::ErrorKind::UnexpectedEof,
            )))
        });
        let mut sink = MockSink::new();
        sink.expect_export().never();
        sink.expect_flush().never();

        let result = run(&converter(), &mut source, &mut sink, ErrorPolicy::Skip);

        assert!(matches!(result, Err(RunErr::Import(_))));
    }

    #[test]
    fn test_run_stops_on_export_error() {
        let mut source = MockSource::new();
        source
            .expect_import()
            .times(1)
            .returning(|| Ok(Some(VALID.to_string())));
        let mut sink = MockSink::new();
        sink.expect_export().times(1).returning(|_| {
            Err(ExporterError::WriteErr(io::Error::from(
                io::ErrorKind::BrokenPipe,
            )))
        });

        let result = run(&converter(), &mut source, &mut sink, ErrorPolicy::Skip);

        assert!(matches!(result, Err(RunErr::Export(_))));
    }

    #[test]
    #[serial]
    fn test_application_state_reads_configuration_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "schema: direction action\nexporter:\n  destination: file").unwrap();

        let state = init_config(file.path().to_str().unwrap()).unwrap();
        let config = state.config().unwrap();

        assert_eq!("direction action", config.schema.to_string());
        assert_eq!(ExporterVariants::File, config.exporter.destination);
    }

    #[test]
    #[serial]
    fn test_init_components_rejects_file_exporter_without_path() {
        let state = init_config("/nonexistent/flowlog.yaml").unwrap();
        let mut config = state.config().unwrap();
        config.exporter.destination = ExporterVariants::File;

        let result = ApplicationState::init_components(config);

        assert!(matches!(
            result,
            Err(AppInitErr::Constructor(ConstructorErr::MissingSetting(_)))
        ));
    }
}
