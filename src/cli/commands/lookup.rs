//! Lookup and get commands.

use anyhow::{Context, Result};
use clap::Parser;
use indexmap::IndexMap;
use tracing::info;

use super::CommandContext;
use rustible_etcd::etcd::EtcdClient;
use rustible_etcd::plugins::lookup::{LookupContext, LookupOptions, LookupRegistry, LookupTerms};

/// Arguments for the lookup command
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// Keys to resolve
    #[arg(required_unless_present = "labels", conflicts_with = "labels")]
    pub keys: Vec<String>,

    /// Labeled key (NAME=KEY), may be repeated
    #[arg(short = 'l', long = "label", value_parser = parse_label)]
    pub labels: Vec<(String, String)>,

    /// Only fetch the immediate children of directories
    #[arg(long)]
    pub no_recursive: bool,
}

impl LookupArgs {
    /// Normalized lookup terms
    pub fn terms(&self) -> LookupTerms {
        if self.labels.is_empty() {
            LookupTerms::Keys(self.keys.clone())
        } else {
            LookupTerms::Labeled(self.labels.iter().cloned().collect::<IndexMap<_, _>>())
        }
    }

    /// Execute the lookup command
    pub fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        let terms = self.terms();
        let options = LookupOptions::new().with_option("recursive", !self.no_recursive);
        let context = LookupContext::new().with_etcd_config(ctx.etcd_config().clone());

        info!(
            url = %ctx.etcd_config().url,
            terms = terms.len(),
            "Running etcd lookup"
        );

        let registry = LookupRegistry::with_builtins();
        let results = registry
            .lookup_terms("etcd", &terms, &options, &context)
            .context("etcd lookup failed")?;

        ctx.emit(&results)?;
        Ok(0)
    }
}

/// Arguments for the get command
#[derive(Parser, Debug, Clone)]
pub struct GetArgs {
    /// Key to fetch
    pub key: String,

    /// Only fetch the immediate children of a directory
    #[arg(long)]
    pub no_recursive: bool,
}

impl GetArgs {
    /// Execute the get command
    pub fn execute(&self, ctx: &CommandContext) -> Result<i32> {
        let client = EtcdClient::from_config(ctx.etcd_config())?;
        let value = client
            .get(&self.key, !self.no_recursive)
            .with_context(|| format!("Failed to resolve '{}'", self.key))?;

        ctx.emit(&value)?;
        Ok(0)
    }
}

fn parse_label(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((label, key)) if !label.is_empty() && !key.is_empty() => {
            Ok((label.to_string(), key.to_string()))
        }
        _ => Err(format!("expected NAME=KEY, got '{}'", s)),
    }
}
