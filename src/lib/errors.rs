use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors that can occur while loading, validating, or saving the profile config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file exists but is not a valid profile document.
    #[error("Malformed configuration file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
    /// The document could not be encoded as TOML.
    #[error("Failed to serialize configuration for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },
    /// The file (or its parent directory) could not be written.
    #[error("Failed to write configuration file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a malformed-file failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Malformed { path, source }
    }
}

/// Failures raised by the profile registry and profile entities.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("No such profile: {name}")]
    NoSuchProfile { name: String },
    #[error("Profile already exists: {name}")]
    ProfileAlreadyExists { name: String },
    #[error("Invalid profile name `{name}`: must be a single, non-empty path component")]
    InvalidName { name: String },
    #[error("Filesystem operation failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to spawn browser `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ProfileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures of the interactive profile picker.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Menu command `{command}` could not be parsed: {message}")]
    InvalidCommand { command: String, message: String },
    #[error("Failed to start menu command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O failed while talking to menu command `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("Menu command `{command}` failed (exit={exit_code:?}): {stderr}")]
    Failed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
}

/// Rejections raised while turning CLI flags into a single requested action.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("Options are mutually exclusive: {}", actions.join(", "))]
    MutuallyExclusiveOptions { actions: Vec<&'static str> },
}
