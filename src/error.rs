//! Error types for configuration loading, resolution and access

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed reading config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("Unsupported config format for {origin} (expected .toml, .yaml, .yml, .json or .properties)")]
    UnsupportedFormat { origin: String },

    #[error("Invalid path expression '{path}': {reason}")]
    BadPath { path: String, reason: String },

    #[error("Could not resolve substitution ${{{reference}}} at '{path}'")]
    UnresolvedSubstitution { path: String, reference: String },

    #[error("Substitution cycle while resolving '{path}': {chain}")]
    SubstitutionCycle { path: String, chain: String },

    #[error("Cannot concatenate {found} from ${{{reference}}} into the string at '{path}'")]
    InvalidConcatenation {
        path: String,
        reference: String,
        found: &'static str,
    },

    #[error("No configuration setting found for path '{path}'")]
    Missing { path: String },

    #[error("'{path}' has type {found} rather than {expected}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Configuration has already been initialized")]
    AlreadyInitialized,

    #[error("Failed to extract typed config: {0}")]
    Extract(#[from] Box<figment::Error>),
}

impl ConfigError {
    pub(crate) fn parse(origin: impl Into<String>, message: impl ToString) -> Self {
        ConfigError::Parse {
            origin: origin.into(),
            message: message.to_string(),
        }
    }

    /// True for the "path not present" class of errors.
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::Missing { .. })
    }
}
