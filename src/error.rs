//! Error types for rustible-etcd.
//!
//! Layer-specific errors live next to their code ([`crate::etcd::EtcdError`],
//! [`crate::plugins::lookup::LookupError`]); this module holds the crate-level
//! error raised while loading configuration and setting up logging.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rustible-etcd operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for rustible-etcd.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading or parsing a configuration file.
    #[error("Failed to load config '{path}': {message}")]
    ConfigLoad {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration for '{key}': {message}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates a new config load error.
    pub fn config_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new invalid config error.
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for CLI exit status.
    ///
    /// Configuration problems exit with 2 so they can be told apart from a
    /// failed lookup, which exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ConfigLoad { .. } | Error::InvalidConfig { .. } => 2,
        }
    }
}
