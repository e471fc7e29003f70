//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving, or applying patches.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No parameter has this id
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Value not accepted by the parameter
    #[error("invalid value {value} for parameter '{param}': {reason}")]
    InvalidValue {
        /// Parameter id.
        param: String,
        /// Rejected value.
        value: f32,
        /// Why the value was rejected.
        reason: String,
    },

    /// Malformed `id=value` override
    #[error("invalid override '{input}': {reason}")]
    InvalidOverride {
        /// Text as given.
        input: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(param: impl Into<String>, value: f32, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            param: param.into(),
            value,
            reason: reason.into(),
        }
    }

    /// Create an invalid override error.
    pub fn invalid_override(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidOverride {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
