//! etcd Lookup Plugin
//!
//! Resolves keys against an etcd store and exposes the flattened key tree as
//! template data. Similar to Ansible's `etcd` lookup plugin.
//!
//! # Usage
//!
//! ```yaml
//! # Scalar key
//! port: "{{ lookup('etcd', '/app/port') }}"
//!
//! # A directory expands into one {key, value} record per entry
//! - debug: msg="{{ item.key }} = {{ item.value }}"
//!   with_etcd: ['/app/db']
//!
//! # Labeled keys
//! - debug: msg="{{ item.key }} = {{ item.value }}"
//!   with_etcd: { port: '/app/port', host: '/app/db/host' }
//! ```
//!
//! # Options
//!
//! - `url` (string): Base URL of the store (default: `http://127.0.0.1:4001`)
//! - `version` (string): Keys API version, `v1` or `v2` (default: `v2`)
//! - `recursive` (bool): Fetch whole subtrees (default: true)
//! - `timeout` (int): Request timeout in seconds (default: transport default)

use serde_json::{json, Value};
use tracing::debug;

use super::{
    LookupContext, LookupError, LookupOptionInfo, LookupOptions, LookupPlugin, LookupResult,
    LookupTerms,
};
use crate::etcd::{ApiVersion, EtcdClient};

/// etcd lookup plugin
#[derive(Debug, Clone, Default)]
pub struct EtcdLookup;

impl EtcdLookup {
    /// Create a new EtcdLookup instance
    pub fn new() -> Self {
        Self
    }

    /// Build a client from the context defaults and per-lookup options
    fn client(&self, options: &LookupOptions, context: &LookupContext) -> LookupResult<EtcdClient> {
        let mut config = context.etcd.clone();

        if let Some(url) = options.get_string("url") {
            config.url = url;
        }
        if let Some(version) = options.get_string("version") {
            config.version = parse_version(&version)?;
        }
        if let Some(timeout) = options.get_u64("timeout") {
            config.timeout = Some(timeout);
        }

        Ok(EtcdClient::from_config(&config)?)
    }

    /// Fetch every term in order and shape the results.
    ///
    /// Labeled terms yield one `{key, value}` record per label. A bare key
    /// whose value is a mapping yields one record per entry; any other value
    /// is passed through as is.
    pub fn run(
        &self,
        client: &EtcdClient,
        terms: &LookupTerms,
        recursive: bool,
    ) -> LookupResult<Vec<Value>> {
        let mut results = Vec::with_capacity(terms.len());

        match terms {
            LookupTerms::Labeled(labeled) => {
                for (label, key) in labeled {
                    let value = client.get(key, recursive)?;
                    results.push(record(label, value));
                }
            }
            LookupTerms::Keys(keys) => {
                for key in keys {
                    match client.get(key, recursive)? {
                        Value::Object(entries) => {
                            results.extend(
                                entries
                                    .into_iter()
                                    .map(|(entry_key, value)| record(&entry_key, value)),
                            );
                        }
                        other => results.push(other),
                    }
                }
            }
        }

        debug!(terms = terms.len(), results = results.len(), "etcd lookup complete");
        Ok(results)
    }
}

fn record(key: &str, value: Value) -> Value {
    json!({ "key": key, "value": value })
}

fn parse_version(version: &str) -> LookupResult<ApiVersion> {
    version.parse().map_err(|e: crate::etcd::EtcdError| LookupError::InvalidOption {
        option: "version".to_string(),
        message: e.to_string(),
    })
}

impl LookupPlugin for EtcdLookup {
    fn name(&self) -> &'static str {
        "etcd"
    }

    fn description(&self) -> &'static str {
        "Reads keys and key trees from an etcd store"
    }

    fn lookup(
        &self,
        terms: &LookupTerms,
        options: &LookupOptions,
        context: &LookupContext,
    ) -> LookupResult<Vec<Value>> {
        let client = self.client(options, context)?;
        let recursive = options.get_bool_or("recursive", true);
        self.run(&client, terms, recursive)
    }

    fn validate_options(&self, options: &LookupOptions) -> LookupResult<()> {
        if let Some(version) = options.get_string("version") {
            parse_version(&version)?;
        }

        if options.has("recursive") && options.get_bool("recursive").is_none() {
            return Err(LookupError::InvalidOption {
                option: "recursive".to_string(),
                message: "expected a boolean".to_string(),
            });
        }

        if options.has("timeout") && options.get_u64("timeout").is_none() {
            return Err(LookupError::InvalidOption {
                option: "timeout".to_string(),
                message: "expected a number of seconds".to_string(),
            });
        }

        Ok(())
    }

    fn examples(&self) -> Vec<&'static str> {
        vec![
            "lookup('etcd', '/app/port')",
            "lookup('etcd', '/app', url='http://etcd.local:2379')",
            "with_etcd: { port: '/app/port', host: '/app/db/host' }",
        ]
    }

    fn available_options(&self) -> Vec<LookupOptionInfo> {
        vec![
            LookupOptionInfo::new("url", "Base URL of the etcd store", "string")
                .with_default(crate::etcd::DEFAULT_HOST),
            LookupOptionInfo::new("version", "Keys API version (v1 or v2)", "string")
                .with_default("v2"),
            LookupOptionInfo::new("recursive", "Fetch whole subtrees", "bool").with_default("true"),
            LookupOptionInfo::new("timeout", "Request timeout in seconds", "int"),
        ]
    }
}
