//! Subcommands module for rustible-etcd CLI
//!
//! This module contains all the subcommand implementations.

pub mod lookup;

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::cli::{Cli, OutputFormat};
use rustible_etcd::config::{Config, EtcdConfig};

/// Common context shared between commands
pub struct CommandContext {
    /// Configuration with command-line overrides applied
    pub config: Config,
    /// Output format
    pub output: OutputFormat,
}

impl CommandContext {
    /// Create a new command context from CLI arguments
    pub fn new(cli: &Cli, mut config: Config) -> Self {
        if let Some(ref url) = cli.url {
            config.etcd.url = url.clone();
        }
        if let Some(version) = cli.api_version {
            config.etcd.version = version;
        }
        if let Some(timeout) = cli.timeout {
            config.etcd.timeout = Some(timeout);
        }

        Self {
            config,
            output: cli.output,
        }
    }

    pub fn etcd_config(&self) -> &EtcdConfig {
        &self.config.etcd
    }

    /// Write `value` to stdout in the selected format
    pub fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let rendered = match self.output {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        };

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", rendered.trim_end())?;
        Ok(())
    }
}
