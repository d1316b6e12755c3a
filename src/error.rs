//! Error types shared by the connection, configuration and GUI layers.

use thiserror::Error;

/// Top-level error for everything that can stop the viewer from starting.
///
/// Errors that happen while the viewer is already running (bad lines, read
/// errors, teardown I/O) are logged instead of being surfaced through this
/// type.
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ConfigFile(#[from] serde_json::Error),

    #[error("could not resolve {addr}: {source}")]
    Resolve {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("window error: {0}")]
    Gui(String),
}

impl From<eframe::Error> for ScopeError {
    fn from(e: eframe::Error) -> Self {
        ScopeError::Gui(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScopeError>;
