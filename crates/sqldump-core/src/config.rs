//! # Dumper Configuration
//!
//! [`DumperConfig`] says where artifacts go, how they are named, whether row
//! data is included and how the file is written. It can be built in code,
//! deserialized, or loaded from the environment.
//!
//! ## Environment Variables
//!
//! - `SQLDUMP_DIR` - Destination directory (default: `.`)
//! - `SQLDUMP_NAME_FORMAT` - chrono strftime pattern for artifact names (default: `%Y%m%d%H%M%S`)
//! - `SQLDUMP_WITH_DATA` - Include row data (default: true)
//! - `SQLDUMP_WRITE_MODE` - `direct` or `staged` (default: `direct`)

use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;
use std::{env, fmt};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Extension appended to every artifact name.
pub const ARTIFACT_EXTENSION: &str = "sql";

/// Default artifact name pattern.
pub const DEFAULT_NAME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Error type for configuration loading and validation
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid directory: {}", path.display())]
    InvalidDirectory { path: PathBuf },

    #[error("Invalid artifact name format '{pattern}': {reason}")]
    InvalidNameFormat { pattern: String, reason: String },

    #[error("Invalid environment variable '{key}': {message}")]
    InvalidEnvVar { key: String, message: String },
}

/// How the artifact reaches the destination directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Create the artifact before extraction starts. A failed dump leaves an
    /// empty or incomplete file behind.
    #[default]
    Direct,
    /// Write into a temporary file next to the artifact and rename it into
    /// place after a successful render. A failed dump leaves nothing.
    Staged,
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(WriteMode::Direct),
            "staged" => Ok(WriteMode::Staged),
            other => Err(format!("unknown write mode '{other}', expected direct/staged")),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Direct => f.write_str("direct"),
            WriteMode::Staged => f.write_str("staged"),
        }
    }
}

/// Settings for a [`Dumper`](crate::Dumper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumperConfig {
    /// Directory receiving artifacts; must exist.
    pub dir: PathBuf,
    /// chrono strftime pattern naming each artifact.
    pub name_format: String,
    /// Dump row data as well as table structure.
    pub with_row_data: bool,
    pub write_mode: WriteMode,
}

impl Default for DumperConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            name_format: DEFAULT_NAME_FORMAT.to_string(),
            with_row_data: true,
            write_mode: WriteMode::Direct,
        }
    }
}

impl DumperConfig {
    pub fn new(dir: impl Into<PathBuf>, name_format: impl Into<String>, with_row_data: bool) -> Self {
        Self {
            dir: dir.into(),
            name_format: name_format.into(),
            with_row_data,
            ..Self::default()
        }
    }

    /// Check the directory and the name pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dir.is_dir() {
            return Err(ConfigError::InvalidDirectory {
                path: self.dir.clone(),
            });
        }
        validate_name_format(&self.name_format)?;
        // a pattern can still produce an unusable name, e.g. "%Y/%m"
        self.artifact_name(&chrono::Utc::now())?;
        Ok(())
    }

    /// File name (without directory) of the artifact for `now`.
    pub fn artifact_name<Tz>(&self, now: &DateTime<Tz>) -> Result<String, ConfigError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut stem = String::new();
        write!(stem, "{}", now.format(&self.name_format))
            .map_err(|_| name_error(&self.name_format, "pattern could not be formatted"))?;

        if stem.is_empty() {
            return Err(name_error(&self.name_format, "pattern produces an empty name"));
        }
        if stem.contains(['/', '\\', '\0']) {
            return Err(name_error(&self.name_format, "pattern produces a path separator"));
        }
        Ok(format!("{stem}.{ARTIFACT_EXTENSION}"))
    }

    /// Full artifact path for `now`.
    pub fn artifact_path<Tz>(&self, now: &DateTime<Tz>) -> Result<PathBuf, ConfigError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Ok(self.dir.join(self.artifact_name(now)?))
    }
}

fn validate_name_format(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(name_error(pattern, "pattern is empty"));
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(name_error(pattern, "unsupported strftime specifier"));
    }
    Ok(())
}

fn name_error(pattern: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidNameFormat {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}

/// Builder for [`DumperConfig`] with environment variable support
#[derive(Debug, Clone, Default)]
pub struct DumperConfigBuilder {
    config: DumperConfig,
}

impl DumperConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::default();

        if let Some(dir) = get_env_string("SQLDUMP_DIR") {
            builder = builder.dir(dir);
        }
        if let Some(format) = get_env_string("SQLDUMP_NAME_FORMAT") {
            builder = builder.name_format(format);
        }
        if let Some(with_data) = get_env_bool("SQLDUMP_WITH_DATA")? {
            builder = builder.with_row_data(with_data);
        }
        if let Some(mode) = get_env_parsed::<WriteMode>("SQLDUMP_WRITE_MODE")? {
            builder = builder.write_mode(mode);
        }

        Ok(builder)
    }

    #[must_use]
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dir = dir.into();
        self
    }

    #[must_use]
    pub fn name_format(mut self, format: impl Into<String>) -> Self {
        self.config.name_format = format.into();
        self
    }

    #[must_use]
    pub fn with_row_data(mut self, with_row_data: bool) -> Self {
        self.config.with_row_data = with_row_data;
        self
    }

    #[must_use]
    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.config.write_mode = mode;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<DumperConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn get_env_string(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn get_env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(val) => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidEnvVar {
                key: key.to_string(),
                message: format!(
                    "invalid boolean value '{val}', expected true/false/1/0/yes/no/on/off"
                ),
            }),
        },
        Err(_) => Ok(None),
    }
}

fn get_env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.parse::<T>().map(Some).map_err(|e| ConfigError::InvalidEnvVar {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(None),
    }
}
