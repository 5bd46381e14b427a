//! Runtime settings: optional TOML file layered under `LEGIS_*` env vars.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::PathExpressionError;
use crate::parser::{PathSet, PathSources};

pub const DEFAULT_CONFIG_FILE: &str = "legislative_activity.toml";
const ENV_PREFIX: &str = "LEGIS";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub start_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub output: Option<PathBuf>,
    pub paths: PathSources,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            start_url: "https://www.congress.gov".to_string(),
            user_agent: concat!("legislative_activity/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            max_retries: 3,
            output: None,
            paths: PathSources::default(),
        }
    }
}

impl Settings {
    /// Load from `file` (required when given, otherwise the default file if it
    /// exists), then apply environment overrides such as `LEGIS_START_URL` or
    /// `LEGIS_PATHS__STATUS`.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        Config::builder()
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Compile the configured path expressions. Fails before any fetch if one
    /// is malformed.
    pub fn path_set(&self) -> Result<PathSet, PathExpressionError> {
        self.paths.compile()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
