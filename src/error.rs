//! Error handling for coordinate cleaning operations.
//!
//! Separates fatal failures (configuration, I/O, interruption) from
//! record-level problems that only cause a single line to be skipped.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Cannot access file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Report serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed record on line {line_number}: {reason}")]
    MalformedRecord { line_number: usize, reason: String },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl CleanerError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a malformed record error
    pub fn malformed(line_number: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line_number,
            reason: reason.into(),
        }
    }

    /// Attach a path to an I/O failure, mapping `NotFound` to [`CleanerError::FileNotFound`]
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileAccess { path, source }
        }
    }

    /// Whether the error must abort the run rather than skip a single record
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MalformedRecord { .. })
    }
}

pub type Result<T> = std::result::Result<T, CleanerError>;
