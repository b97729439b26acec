//! Error types for the board database build.

use std::path::PathBuf;

use thiserror::Error;

use crate::kconfig::KconfigError;

/// Errors that can occur while building or publishing the board database.
#[derive(Debug, Error)]
pub enum Error {
    /// The project root has no `Kconfig` file.
    #[error("Kconfig entry point not found: {}", .0.display())]
    MissingEntryPoint(PathBuf),

    /// The Kconfig tree failed to load.
    #[error(transparent)]
    Kconfig(#[from] KconfigError),

    /// IO error during read/write.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A module's `zephyr/module.yml` could not be parsed.
    #[error("Invalid module metadata in {}: {message}", path.display())]
    ModuleMetadata { path: PathBuf, message: String },

    /// The configuration file could not be parsed.
    #[error("Invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    /// Create an IO error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a module metadata error.
    pub fn module_metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ModuleMetadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for board database operations.
pub type Result<T> = std::result::Result<T, Error>;
