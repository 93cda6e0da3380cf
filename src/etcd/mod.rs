//! etcd keys API client.
//!
//! [`EtcdClient::get`] fetches a key, optionally with its whole subtree, and
//! flattens the answer into template data with [`tree::flatten`].
//!
//! Failures are split in two on purpose:
//!
//! - anything that goes wrong while talking to the store (connection refused,
//!   timeout, non-2xx status, unreadable body) yields an empty string;
//! - a body that was received but cannot be decoded or walked is returned as
//!   an [`EtcdError`].
//!
//! # Example
//!
//! ```rust,ignore
//! use rustible_etcd::etcd::{ApiVersion, EtcdClient};
//!
//! let client = EtcdClient::new("http://127.0.0.1:4001", ApiVersion::V2)?;
//! let port = client.get("/app/port", true)?;
//! ```

pub mod node;
pub mod tree;

pub use node::Node;
pub use tree::{flatten, KeyTree};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::EtcdConfig;

/// Default etcd endpoint.
pub const DEFAULT_HOST: &str = "http://127.0.0.1:4001";

/// Errors raised while decoding or flattening an etcd response.
#[derive(Error, Debug)]
pub enum EtcdError {
    /// The configured host or a derived key URL is not a valid http(s) URL
    #[error("Invalid etcd URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// Unknown API version string
    #[error("Unsupported etcd API version: {0}")]
    UnsupportedVersion(String),

    /// HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// Response body is not valid JSON or not shaped like a node
    #[error("Failed to decode etcd response: {0}")]
    Decode(#[from] serde_json::Error),

    /// v2 response without a `node` field
    #[error("etcd response has no 'node' field")]
    MissingNode,

    /// The root node's own path is absent from the flattened tree
    #[error("Key '{0}' not found in flattened etcd tree")]
    PathNotFound(String),
}

/// etcd keys API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V1,
    #[default]
    V2,
}

impl ApiVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = EtcdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v1" | "1" => Ok(ApiVersion::V1),
            "v2" | "2" => Ok(ApiVersion::V2),
            other => Err(EtcdError::UnsupportedVersion(other.to_string())),
        }
    }
}

/// Blocking client for the etcd keys API.
#[derive(Debug, Clone)]
pub struct EtcdClient {
    base_url: Url,
    api_version: ApiVersion,
    http: reqwest::blocking::Client,
}

impl EtcdClient {
    /// Create a client for `host` using the transport's default timeout.
    pub fn new(host: &str, api_version: ApiVersion) -> Result<Self, EtcdError> {
        Self::build(host, api_version, None)
    }

    /// Create a client from configuration.
    pub fn from_config(config: &EtcdConfig) -> Result<Self, EtcdError> {
        Self::build(
            &config.url,
            config.version,
            config.timeout.map(Duration::from_secs),
        )
    }

    fn build(
        host: &str,
        api_version: ApiVersion,
        timeout: Option<Duration>,
    ) -> Result<Self, EtcdError> {
        let mut base_url = parse_host(host)?;
        base_url
            .path_segments_mut()
            .map_err(|_| cannot_be_base(host))?
            .pop_if_empty()
            .push(api_version.as_str())
            .push("keys");

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            api_version,
            http: builder.build()?,
        })
    }

    /// `{host}/{version}/keys`
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// URL for `key`. The recursive flag is only understood by v2.
    ///
    /// Key segments are percent-encoded, so `?`, `#` and `..` inside a key
    /// never turn into a query, a fragment or a parent directory.
    pub fn key_url(&self, key: &str, recursive: bool) -> Result<Url, EtcdError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| cannot_be_base(self.base_url.as_str()))?
            .extend(key.split('/').filter(|segment| !segment.is_empty()));

        if recursive && self.api_version == ApiVersion::V2 {
            url.query_pairs_mut().append_pair("recursive", "true");
        }

        Ok(url)
    }

    /// Fetch `key` and flatten it into template data.
    ///
    /// Returns an empty string when the store cannot be reached or answers
    /// with an error status.
    pub fn get(&self, key: &str, recursive: bool) -> Result<serde_json::Value, EtcdError> {
        let url = self.key_url(key, recursive)?;
        debug!(%url, key, recursive, "Fetching etcd key");

        let Some(body) = self.fetch(&url) else {
            return Ok(serde_json::Value::String(String::new()));
        };

        self.value_from_body(key, &body, recursive)
    }

    /// Decode a keys API response body and flatten it.
    pub fn value_from_body(
        &self,
        key: &str,
        body: &str,
        recursive: bool,
    ) -> Result<serde_json::Value, EtcdError> {
        let results: serde_json::Value = serde_json::from_str(body)?;
        let node = Node::from_response(key, results, self.api_version)?;
        flatten(&node, recursive)
    }

    fn fetch(&self, url: &Url) -> Option<String> {
        let response = match self.http.get(url.clone()).send() {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "etcd request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "etcd returned error status");
            return None;
        }

        match response.text() {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(%url, error = %e, "Failed to read etcd response body");
                None
            }
        }
    }
}

fn cannot_be_base(url: &str) -> EtcdError {
    EtcdError::InvalidUrl {
        url: url.to_string(),
        message: "URL cannot carry a path".to_string(),
    }
}

fn parse_host(host: &str) -> Result<Url, EtcdError> {
    let invalid = |message: String| EtcdError::InvalidUrl {
        url: host.to_string(),
        message,
    };

    let url = Url::parse(host).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(invalid(format!("unsupported scheme '{}'", scheme))),
    }
}
