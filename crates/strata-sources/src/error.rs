//! Error types for strata-sources

use std::path::PathBuf;

/// Result type for strata-sources operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing a configuration tree
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the specified config path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to parse {format} config at {path}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Script config at {path} failed: {message}")]
    Script { path: PathBuf, message: String },

    #[error("Object store error for {key}: {message}")]
    Store { key: String, message: String },

    #[error("Failed to start runtime for {resource}: {source}")]
    Runtime {
        resource: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn store(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            key: key.into(),
            message: message.into(),
        }
    }

    /// The file or object this error is about
    pub fn resource(&self) -> String {
        match self {
            Error::Io { path, .. }
            | Error::NotADirectory { path }
            | Error::Parse { path, .. }
            | Error::Script { path, .. } => path.display().to_string(),
            Error::Store { key, .. } => key.clone(),
            Error::Runtime { resource, .. } => resource.clone(),
        }
    }
}

impl From<Error> for strata_core::Error {
    fn from(err: Error) -> Self {
        strata_core::Error::source_error(err.resource(), err.to_string())
    }
}
