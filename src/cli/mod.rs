//! CLI module for rustible-etcd
//!
//! This module provides the command-line interface, including argument
//! parsing and subcommand handling.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use rustible_etcd::config::LogFormat;
use rustible_etcd::etcd::ApiVersion;

/// rustible-etcd - resolve variables from an etcd key space
#[derive(Parser, Debug, Clone)]
#[command(name = "rustible-etcd")]
#[command(author = "Rustible Contributors")]
#[command(version)]
#[command(about = "Resolve Rustible lookup terms against etcd", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the etcd store
    #[arg(long, global = true, env = "RUSTIBLE_ETCD_URL")]
    pub url: Option<String>,

    /// Keys API version (v1 or v2)
    #[arg(long = "api-version", global = true, env = "RUSTIBLE_ETCD_VERSION", value_parser = parse_api_version)]
    pub api_version: Option<ApiVersion>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, env = "RUSTIBLE_ETCD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "json")]
    pub output: OutputFormat,

    /// Log format on stderr (pretty, compact or json)
    #[arg(long = "log-format", global = true, value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the etcd lookup over bare or labeled keys
    Lookup(commands::lookup::LookupArgs),

    /// Print the flattened value of a single key
    Get(commands::lookup::GetArgs),
}

fn parse_api_version(s: &str) -> Result<ApiVersion, String> {
    s.parse().map_err(|e: rustible_etcd::etcd::EtcdError| e.to_string())
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse().map_err(|e: rustible_etcd::error::Error| e.to_string())
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }
}
