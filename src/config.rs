//! Layered configuration: an optional YAML file overridden by `FLOWLOG__*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use derive_more::{Display, Error};
use log::{debug, warn};
use serde::de::DeserializeOwned;

pub const DEFAULT_ENV_VAR_PREFIX: &str = "FLOWLOG";
const ENV_VAR_SEPARATOR: &str = "__";

#[derive(Debug, Display, Error)]
pub enum ConfigErr {
    #[display(fmt = "unable to read configuration: {}", _0)]
    Read(config::ConfigError),
}

/// Merged view of the configuration file and the environment.
pub struct ConfigCache {
    config: Config,
    path: PathBuf,
    file_found: bool,
}

impl ConfigCache {
    /// Configuration file is optional, environment variables take precedence over it.
    ///
    /// The file is always read as YAML, whatever its extension.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ConfigErr> {
        let path = path.as_ref().to_path_buf();
        let file_found = path.is_file();

        if file_found {
            debug!("reading configuration file [{}]", path.display());
        } else {
            warn!(
                "configuration file [{}] not found, using defaults and environment",
                path.display()
            );
        }

        let config = Config::builder()
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(DEFAULT_ENV_VAR_PREFIX).separator(ENV_VAR_SEPARATOR),
            )
            .build()
            .map_err(ConfigErr::Read)?;

        Ok(Self {
            config,
            path,
            file_found,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the configuration file existed when the cache was built.
    pub fn file_found(&self) -> bool {
        self.file_found
    }

    pub fn get_config<T: DeserializeOwned>(&self) -> Result<T, ConfigErr> {
        self.config
            .clone()
            .try_deserialize()
            .map_err(ConfigErr::Read)
    }
}
