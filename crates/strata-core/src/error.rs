//! Error types for strata-core

/// Result type for strata-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or reading a configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source provider could not produce a tree
    #[error("Failed to load configuration from {resource}: {message}")]
    Source { resource: String, message: String },

    /// Invalid construction arguments
    #[error("Invalid configuration options: {message}")]
    Configuration { message: String },

    /// Load attempted after the settings were read
    #[error("Settings are locked and can't be updated once they have been accessed")]
    Locked,

    /// Requested path is absent
    #[error("Configuration value not found: {path}")]
    NotFound { path: String },

    /// Typed getter called on a value of another variant
    #[error("Expected {expected} at {path}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Sub-tree could not be deserialized into the requested type
    #[error("Failed to deserialize configuration value at {path}: {message}")]
    Deserialize { path: String, message: String },
}

impl Error {
    pub fn source_error(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }
}
