//! Configuration module for rustible-etcd
//!
//! Handles loading and merging configuration from multiple sources:
//! - Default values
//! - System configuration (/etc/rustible/etcd.toml)
//! - User configuration (~/.rustible/etcd.toml)
//! - Project configuration (./rustible-etcd.toml)
//! - Environment variables
//! - Command-line arguments (applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::etcd::{ApiVersion, DEFAULT_HOST};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// etcd connection settings
    pub etcd: EtcdConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// etcd connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EtcdConfig {
    /// Base URL of the store
    pub url: String,

    /// Keys API version
    pub version: ApiVersion,

    /// Request timeout in seconds; the HTTP transport default when unset
    pub timeout: Option<u64>,
}

impl Default for EtcdConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_HOST.to_string(),
            version: ApiVersion::V2,
            timeout: None,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when neither `-v` nor `RUST_LOG` say otherwise
    pub level: LogLevel,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert from verbosity level (0-3+).
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(Error::invalid_config(
                "logging.level",
                format!("unknown level '{}'", other),
            )),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty console output with colors
    Pretty,
    /// Compact single-line output
    Compact,
    /// JSON structured output
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::invalid_config(
                "logging.format",
                format!("unknown format '{}'", other),
            )),
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Config::default();

        // The first file found wins; an explicit path must exist
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(Error::config_load(path, "file does not exist"));
            }
            config = Config::from_file(path)?;
        } else if let Some(path) = Self::get_config_paths().into_iter().find(|p| p.exists()) {
            config = Config::from_file(&path)?;
        }

        // Apply environment variable overrides
        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Get the list of configuration file paths to check, most specific first
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Environment variable
        if let Ok(env_config) = std::env::var("RUSTIBLE_ETCD_CONFIG") {
            paths.push(PathBuf::from(env_config));
        }

        // Project config (current directory)
        paths.push(PathBuf::from("rustible-etcd.toml"));

        // User config
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".rustible/etcd.toml"));
        }

        // System-wide config
        paths.push(PathBuf::from("/etc/rustible/etcd.toml"));

        paths
    }

    /// Load from a specific file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config_load(path, e.to_string()))?;

        // Determine format based on extension
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let parsed: std::result::Result<Config, String> = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            "json" => serde_json::from_str(&content).map_err(|e| e.to_string()),
            _ => toml::from_str(&content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| Error::config_load(path, message))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        // RUSTIBLE_ETCD_URL
        if let Ok(url) = std::env::var("RUSTIBLE_ETCD_URL") {
            self.etcd.url = url;
        }

        // RUSTIBLE_ETCD_VERSION
        if let Ok(version) = std::env::var("RUSTIBLE_ETCD_VERSION") {
            self.etcd.version = version.parse().map_err(|e: crate::etcd::EtcdError| {
                Error::invalid_config("etcd.version", e.to_string())
            })?;
        }

        // RUSTIBLE_ETCD_TIMEOUT
        if let Ok(timeout) = std::env::var("RUSTIBLE_ETCD_TIMEOUT") {
            let secs = timeout.parse().map_err(|_| {
                Error::invalid_config(
                    "etcd.timeout",
                    format!("'{}' is not a number of seconds", timeout),
                )
            })?;
            self.etcd.timeout = Some(secs);
        }

        // RUSTIBLE_ETCD_LOG_LEVEL
        if let Ok(level) = std::env::var("RUSTIBLE_ETCD_LOG_LEVEL") {
            self.logging.level = level.parse()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.etcd.url, "http://127.0.0.1:4001");
        assert_eq!(config.etcd.version, ApiVersion::V2);
        assert_eq!(config.etcd.timeout, None);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[etcd]
url = "http://etcd.internal:2379"
version = "v1"
timeout = 5
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.etcd.url, "http://etcd.internal:2379");
        assert_eq!(config.etcd.version, ApiVersion::V1);
        assert_eq!(config.etcd.timeout, Some(5));
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "logging:\n  level: debug\n  format: json").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.etcd, EtcdConfig::default());
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[etcd\nurl = ").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(Error::ConfigLoad { .. })));
    }

    #[test]
    #[serial]
    fn test_explicit_missing_path_fails() {
        let path = PathBuf::from("/nonexistent/rustible-etcd.toml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(Error::ConfigLoad { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var("RUSTIBLE_ETCD_URL", "http://10.0.0.1:2379");
        std::env::set_var("RUSTIBLE_ETCD_VERSION", "v1");
        std::env::set_var("RUSTIBLE_ETCD_TIMEOUT", "3");

        let mut config = Config::default();
        let result = config.apply_env_overrides();

        std::env::remove_var("RUSTIBLE_ETCD_URL");
        std::env::remove_var("RUSTIBLE_ETCD_VERSION");
        std::env::remove_var("RUSTIBLE_ETCD_TIMEOUT");

        result.unwrap();
        assert_eq!(config.etcd.url, "http://10.0.0.1:2379");
        assert_eq!(config.etcd.version, ApiVersion::V1);
        assert_eq!(config.etcd.timeout, Some(3));
    }

    #[test]
    #[serial]
    fn test_env_override_rejects_bad_version() {
        std::env::set_var("RUSTIBLE_ETCD_VERSION", "v9");
        let result = Config::default().apply_env_overrides();
        std::env::remove_var("RUSTIBLE_ETCD_VERSION");

        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(2), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(9), LogLevel::Trace);
        assert!(LogLevel::Trace > LogLevel::Info);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(Error::InvalidConfig { ref key, .. }) if key == "logging.format"
        ));
    }
}
