//! Lookup Plugin System for rustible-etcd
//!
//! This module provides the lookup plugin infrastructure the etcd lookup plugs
//! into. The host runtime hands a plugin its invocation terms, options and a
//! context, and receives a list of JSON values to expose as template data.
//!
//! # Architecture
//!
//! 1. **[`LookupPlugin`]** trait: Core trait for all lookup implementations
//! 2. **[`LookupTerms`]**: Normalized invocation terms (bare keys or labeled keys)
//! 3. **[`LookupRegistry`]**: Central registry for lookup plugin discovery
//! 4. **[`LookupContext`]**: Execution context passed to lookups
//!
//! # Example
//!
//! ```rust,ignore
//! use rustible_etcd::plugins::lookup::prelude::*;
//!
//! let registry = LookupRegistry::with_builtins();
//! let context = LookupContext::default();
//!
//! // Bare keys
//! let values = registry.lookup("etcd", &["/app/port"], &context)?;
//!
//! // Labeled keys with options
//! let terms = LookupTerms::from_value(serde_json::json!({"port": "/app/port"}))?;
//! let options = LookupOptions::new().with_option("url", "http://etcd:2379");
//! let records = registry.lookup_terms("etcd", &terms, &options, &context)?;
//! ```

pub mod etcd;

pub use etcd::EtcdLookup;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::config::EtcdConfig;
use crate::etcd::EtcdError;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during lookup operations
#[derive(Error, Debug)]
pub enum LookupError {
    /// The requested lookup plugin was not found
    #[error("Lookup plugin not found: {0}")]
    NotFound(String),

    /// Invalid lookup term or argument
    #[error("Invalid lookup term: {0}")]
    InvalidTerm(String),

    /// Invalid option value
    #[error("Invalid option '{option}': {message}")]
    InvalidOption { option: String, message: String },

    /// The etcd client rejected the request or its response
    #[error("etcd lookup failed: {0}")]
    Etcd(#[from] EtcdError),
}

/// Result type for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;

// ============================================================================
// Lookup Terms
// ============================================================================

/// Invocation terms after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupTerms {
    /// A sequence of bare keys
    Keys(Vec<String>),
    /// Result labels mapped to keys, in invocation order
    Labeled(IndexMap<String, String>),
}

impl LookupTerms {
    /// Normalize raw terms.
    ///
    /// A string is a single key, an array of strings is a key list and an
    /// object of strings maps result labels to keys.
    pub fn from_value(value: serde_json::Value) -> LookupResult<Self> {
        match value {
            serde_json::Value::String(key) => Ok(LookupTerms::Keys(vec![key])),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::String(key) => Ok(key),
                    other => Err(LookupError::InvalidTerm(format!(
                        "expected a key string, got {}",
                        other
                    ))),
                })
                .collect::<LookupResult<Vec<_>>>()
                .map(LookupTerms::Keys),
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(label, key)| match key {
                    serde_json::Value::String(key) => Ok((label, key)),
                    other => Err(LookupError::InvalidTerm(format!(
                        "key for '{}' must be a string, got {}",
                        label, other
                    ))),
                })
                .collect::<LookupResult<IndexMap<_, _>>>()
                .map(LookupTerms::Labeled),
            other => Err(LookupError::InvalidTerm(format!(
                "expected a key, a list of keys or a mapping of labels to keys, got {}",
                other
            ))),
        }
    }

    /// Number of keys to fetch
    pub fn len(&self) -> usize {
        match self {
            LookupTerms::Keys(keys) => keys.len(),
            LookupTerms::Labeled(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<String>> for LookupTerms {
    fn from(keys: Vec<String>) -> Self {
        LookupTerms::Keys(keys)
    }
}

impl From<&[&str]> for LookupTerms {
    fn from(keys: &[&str]) -> Self {
        LookupTerms::Keys(keys.iter().map(|s| s.to_string()).collect())
    }
}

impl From<IndexMap<String, String>> for LookupTerms {
    fn from(labeled: IndexMap<String, String>) -> Self {
        LookupTerms::Labeled(labeled)
    }
}

// ============================================================================
// Lookup Options
// ============================================================================

/// Options that can be passed to lookup plugins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupOptions {
    /// Key-value options passed to the lookup
    #[serde(flatten)]
    pub options: HashMap<String, serde_json::Value>,
}

impl LookupOptions {
    /// Create new empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option
    pub fn with_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Get a string option
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.options.get(key).map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            _ => v.to_string().trim_matches('"').to_string(),
        })
    }

    /// Get a boolean option
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.options.get(key).and_then(|v| match v {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::String(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Some(true),
                "false" | "no" | "0" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        })
    }

    /// Get a boolean option with default
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    /// Get an unsigned integer option
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.options.get(key).and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        })
    }

    /// Check if option exists
    pub fn has(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }
}

// ============================================================================
// Lookup Context
// ============================================================================

/// Context for lookup execution
#[derive(Debug, Clone, Default)]
pub struct LookupContext {
    /// Store connection defaults, overridable per lookup through options
    pub etcd: EtcdConfig,
}

impl LookupContext {
    /// Create a new context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the store connection defaults
    pub fn with_etcd_config(mut self, config: EtcdConfig) -> Self {
        self.etcd = config;
        self
    }

    /// Set the store URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.etcd.url = url.into();
        self
    }
}

// ============================================================================
// Lookup Plugin Trait
// ============================================================================

/// Trait that all lookup plugins must implement
pub trait LookupPlugin: Send + Sync + fmt::Debug {
    /// Returns the name of the lookup plugin
    fn name(&self) -> &'static str;

    /// Returns a description of what the lookup does
    fn description(&self) -> &'static str;

    /// Execute the lookup with the given terms and options
    ///
    /// # Arguments
    ///
    /// * `terms` - The normalized lookup terms
    /// * `options` - Options passed to the lookup
    /// * `context` - Execution context
    ///
    /// # Returns
    ///
    /// A vector of JSON values, one or more per term
    fn lookup(
        &self,
        terms: &LookupTerms,
        options: &LookupOptions,
        context: &LookupContext,
    ) -> LookupResult<Vec<serde_json::Value>>;

    /// Validate options before execution
    fn validate_options(&self, _options: &LookupOptions) -> LookupResult<()> {
        Ok(())
    }

    /// Returns example usage for documentation
    fn examples(&self) -> Vec<&'static str> {
        vec![]
    }

    /// Returns a list of available options with descriptions
    fn available_options(&self) -> Vec<LookupOptionInfo> {
        vec![]
    }
}

/// Information about a lookup option
#[derive(Debug, Clone)]
pub struct LookupOptionInfo {
    /// Option name
    pub name: &'static str,
    /// Option description
    pub description: &'static str,
    /// Option type
    pub option_type: &'static str,
    /// Default value as string
    pub default: Option<&'static str>,
}

impl LookupOptionInfo {
    /// Create a new option info
    pub fn new(name: &'static str, description: &'static str, option_type: &'static str) -> Self {
        Self {
            name,
            description,
            option_type,
            default: None,
        }
    }

    /// Set default value
    pub fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

// ============================================================================
// Lookup Registry
// ============================================================================

/// Registry for managing lookup plugins
#[derive(Debug, Default)]
pub struct LookupRegistry {
    plugins: HashMap<String, Arc<dyn LookupPlugin>>,
}

impl LookupRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in plugins
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(EtcdLookup::new());
        registry
    }

    /// Register a lookup plugin
    pub fn register<P: LookupPlugin + 'static>(&mut self, plugin: P) {
        let name = plugin.name().to_string();
        self.plugins.insert(name, Arc::new(plugin));
    }

    /// Get a lookup plugin by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn LookupPlugin>> {
        self.plugins.get(name).cloned()
    }

    /// Check if a lookup plugin exists
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// List all registered plugin names
    pub fn list(&self) -> Vec<&str> {
        self.plugins.keys().map(|s| s.as_str()).collect()
    }

    /// Execute a lookup over bare keys
    pub fn lookup(
        &self,
        name: &str,
        terms: &[&str],
        context: &LookupContext,
    ) -> LookupResult<Vec<serde_json::Value>> {
        self.lookup_terms(name, &terms.into(), &LookupOptions::default(), context)
    }

    /// Execute a lookup with normalized terms and options
    pub fn lookup_terms(
        &self,
        name: &str,
        terms: &LookupTerms,
        options: &LookupOptions,
        context: &LookupContext,
    ) -> LookupResult<Vec<serde_json::Value>> {
        let plugin = self
            .get(name)
            .ok_or_else(|| LookupError::NotFound(name.to_string()))?;

        plugin.validate_options(options)?;
        plugin.lookup(terms, options, context)
    }
}

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for lookup development and usage.
pub mod prelude {
    pub use super::{
        EtcdLookup, LookupContext, LookupError, LookupOptionInfo, LookupOptions, LookupPlugin,
        LookupRegistry, LookupResult, LookupTerms,
    };
}

// ============================================================================
// Unit Tests
// ============================================================================
