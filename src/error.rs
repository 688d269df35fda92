#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{message}")]
    UnknownTaskId { id: String, message: String },

    #[error("{0}")]
    UnknownCommand(String),

    #[error("{0}")]
    NoArguments(String),

    #[error("io error at {path}: {source}")]
    IoPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed task document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl TrackerError {
    /// Validation failures that are reported to the user without touching
    /// the task document.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::UnknownTaskId { .. }
                | Self::UnknownCommand(_)
                | Self::NoArguments(_)
        )
    }
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
