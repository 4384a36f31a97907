//! Application configuration.
//!
//! `AppConfig` is the serializable shape read from YAML (all keys optional,
//! kebab-case). `AppConfig::resolve` turns its string hints into typed
//! settings and rejects bad values before anything is scanned.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::classifiers::{
    default_definitions, ClassifierDefinition, ClassifierError, ClassifierSet,
};
use crate::services::cataloger::{CatalogerOptions, DEFAULT_MAX_READ_BYTES};
use crate::source::{ParseScopeError, Scope};

mod load;

pub use load::{
    apply_env_overrides, candidate_paths, discover_config, load_config, read_config_file,
    xdg_config_dirs, ENV_PREFIX,
};

/// Name used for config file discovery and environment variables.
pub const APP_NAME: &str = "classify";

/// Errors raised while validating configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bad output value '{0}' (expected 'json' or 'table')")]
    Output(String),

    #[error(transparent)]
    Scope(#[from] ParseScopeError),

    #[error("bad log level configured ({0:?})")]
    LogLevel(String),

    #[error("cannot explicitly set log level (config file or env var) and use -v flag together")]
    ConflictingVerbosity,

    #[error("file-classification.max-read-bytes must be greater than zero")]
    ZeroReadCeiling,
}

/// Report format produced by the frontend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" | "text" => Ok(OutputFormat::Table),
            _ => Err(ConfigError::Output(s.to_string())),
        }
    }
}

/// Logging options as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LogConfig {
    /// Emit log lines as JSON objects.
    pub structured: bool,
    /// Explicit level (`error`, `warn`, `info`, `debug`, `trace`). Empty means
    /// "derive from -v".
    pub level: String,
    /// Write logs to this file instead of stderr. Empty means stderr.
    pub file: String,
}

/// Options for the classification cataloger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FileClassificationConfig {
    /// Worker threads; `0` uses one per CPU.
    pub parallelism: usize,
    /// Hard ceiling on bytes read per file and classifier.
    pub max_read_bytes: u64,
    /// Start from the built-in classifiers.
    pub include_defaults: bool,
    /// Extra classifiers, evaluated after the built-in ones.
    pub classifiers: Vec<ClassifierDefinition>,
}

impl Default for FileClassificationConfig {
    fn default() -> Self {
        Self {
            parallelism: 0,
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
            include_defaults: true,
            classifiers: Vec::new(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AppConfig {
    /// Report format hint (`json` or `table`).
    pub output: String,
    /// Scope hint (`squashed` or `all-layers`).
    pub scope: String,
    /// Suppress all logging output.
    pub quiet: bool,
    pub log: LogConfig,
    pub file_classification: FileClassificationConfig,
    /// Where this config was read from, if anywhere.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: OutputFormat::default().as_str().to_string(),
            scope: Scope::default().as_str().to_string(),
            quiet: false,
            log: LogConfig::default(),
            file_classification: FileClassificationConfig::default(),
            config_path: None,
        }
    }
}

/// Typed logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub structured: bool,
    pub file: Option<PathBuf>,
}

/// Validated, typed view of an `AppConfig` for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub output: OutputFormat,
    pub scope: Scope,
    pub log: LogSettings,
    pub cataloger: CatalogerOptions,
}

impl AppConfig {
    /// Validate string hints and derive typed settings.
    ///
    /// `verbosity` is the number of `-v` flags given on the command line.
    /// `quiet` switches logging off entirely; otherwise an explicit level wins
    /// and may not be combined with `-v`.
    pub fn resolve(&self, verbosity: u8) -> Result<RunSettings, ConfigError> {
        let output = self.output.parse::<OutputFormat>()?;
        let scope = self.scope.parse::<Scope>()?;

        let level = if self.quiet {
            LevelFilter::OFF
        } else if !self.log.level.trim().is_empty() {
            if verbosity > 0 {
                return Err(ConfigError::ConflictingVerbosity);
            }
            parse_level(&self.log.level)?
        } else {
            match verbosity {
                0 => LevelFilter::WARN,
                1 => LevelFilter::INFO,
                _ => LevelFilter::DEBUG,
            }
        };

        let classification = &self.file_classification;
        if classification.max_read_bytes == 0 {
            return Err(ConfigError::ZeroReadCeiling);
        }

        let file = self.log.file.trim();
        Ok(RunSettings {
            output,
            scope,
            log: LogSettings {
                level,
                structured: self.log.structured,
                file: if file.is_empty() { None } else { Some(PathBuf::from(file)) },
            },
            cataloger: CatalogerOptions {
                parallelism: classification.parallelism,
                max_read_bytes: classification.max_read_bytes,
            },
        })
    }

    /// Build the classifier set this configuration asks for: the defaults
    /// (unless disabled) followed by any user classifiers.
    pub fn classifier_set(&self) -> Result<ClassifierSet, ClassifierError> {
        let classification = &self.file_classification;
        let mut definitions =
            if classification.include_defaults { default_definitions() } else { Vec::new() };
        definitions.extend(classification.classifiers.iter().cloned());
        ClassifierSet::new(definitions)
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter, ConfigError> {
    let normalized = match raw.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        other => other.to_string(),
    };
    normalized.parse::<LevelFilter>().map_err(|_| ConfigError::LogLevel(raw.to_string()))
}
