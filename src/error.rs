//! Error kinds surfaced by a monitoring run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    /// The monitored (or predecessor) log could not be opened or read.
    #[error("log file missing or unreadable: {}", .path.display())]
    MissingLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// State file exists but could not be parsed. Restore treats this as a cold start.
    #[error("malformed state file {}: {reason}", .path.display())]
    MalformedStateFile { path: PathBuf, reason: String },

    #[error("pattern configuration error: {0}")]
    PatternConfiguration(String),

    #[error("invalid pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid rotation glob '{pattern}'")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("state file I/O error on {}", .path.display())]
    StateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl MonitorError {
    pub(crate) fn missing_log(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MonitorError::MissingLogFile {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn state_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MonitorError::StateIo {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
