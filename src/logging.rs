//! Structured logging using the tracing crate.
//!
//! Logs go to stderr so that lookup results on stdout stay machine readable.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LogLevel, LoggingConfig};
use crate::error::{Error, Result};

/// Builder for the global logging subscriber.
pub struct LoggingBuilder {
    config: LoggingConfig,
    with_target: bool,
}

impl LoggingBuilder {
    /// Create a new logging builder with default configuration.
    pub fn new() -> Self {
        Self::from_config(LoggingConfig::default())
    }

    /// Create a builder from an existing configuration.
    pub fn from_config(config: LoggingConfig) -> Self {
        Self {
            config,
            with_target: false,
        }
    }

    /// Set the log level.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Raise the level for `-v` flags; never lowers the configured level.
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        if verbosity > 0 {
            self.config.level = self.config.level.max(LogLevel::from_verbosity(verbosity));
        }
        self.with_target = verbosity >= 3;
        self
    }

    /// Set the log format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Effective level.
    pub fn level(&self) -> LogLevel {
        self.config.level
    }

    /// `RUST_LOG` wins over the configured level.
    fn build_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.level.as_str()))
    }

    /// Build and initialize the global subscriber.
    pub fn init(self) -> Result<()> {
        let env_filter = self.build_filter();
        let registry = tracing_subscriber::registry().with(env_filter);

        let result = match self.config.format {
            LogFormat::Pretty => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr)
                        .with_target(self.with_target),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr)
                        .with_target(self.with_target),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };

        result.map_err(|e| Error::invalid_config("logging", e.to_string()))
    }
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_raises_level() {
        let builder = LoggingBuilder::new().with_verbosity(2);
        assert_eq!(builder.level(), LogLevel::Debug);
    }

    #[test]
    fn test_verbosity_does_not_lower_configured_level() {
        let builder = LoggingBuilder::new()
            .with_level(LogLevel::Trace)
            .with_verbosity(1);
        assert_eq!(builder.level(), LogLevel::Trace);

        let builder = LoggingBuilder::new().with_level(LogLevel::Error).with_verbosity(0);
        assert_eq!(builder.level(), LogLevel::Error);
    }

    #[test]
    fn test_format_override() {
        let builder = LoggingBuilder::new().with_format(LogFormat::Json);
        assert_eq!(builder.config.format, LogFormat::Json);
        assert!(!builder.with_target);

        let builder = LoggingBuilder::new().with_verbosity(3);
        assert_eq!(builder.config.format, LogFormat::Compact);
        assert!(builder.with_target);
    }
}
