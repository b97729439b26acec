//! Error types for Kconfig loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading and parsing a Kconfig tree.
///
/// Every variant is fatal: a tree that fails to load yields no partial result.
#[derive(Debug, Error)]
pub enum KconfigError {
    /// A Kconfig file could not be read.
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed Kconfig syntax.
    #[error("{filename}:{linenr}: {message}")]
    Syntax {
        filename: String,
        linenr: u32,
        message: String,
    },

    /// A mandatory `source`/`rsource` pattern matched no file.
    #[error("{filename}:{linenr}: '{pattern}' not found")]
    SourceNotFound {
        filename: String,
        linenr: u32,
        pattern: String,
    },

    /// A file sources itself, directly or through other files.
    #[error("{filename}:{linenr}: recursive 'source' of '{path}'")]
    RecursiveSource {
        filename: String,
        linenr: u32,
        path: String,
    },

    /// `$(error-if,y,...)` fired during preprocessing.
    #[error("{filename}:{linenr}: {message}")]
    UserError {
        filename: String,
        linenr: u32,
        message: String,
    },
}

impl KconfigError {
    /// Create a syntax error at a location.
    pub fn syntax(filename: impl Into<String>, linenr: u32, message: impl Into<String>) -> Self {
        Self::Syntax {
            filename: filename.into(),
            linenr,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
