//! etcd node records as returned by the keys API.

use serde::{Deserialize, Serialize};

use super::{ApiVersion, EtcdError};

/// One entry in etcd's key space.
///
/// The store returns extra bookkeeping fields (`modifiedIndex`, `ttl`, ...)
/// which are ignored here. The root directory of the key space comes back
/// without a `key`, so a missing key is read as the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Full slash-separated path of the node
    #[serde(default)]
    pub key: String,

    /// Set when the node is a directory
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dir: bool,

    /// Stored value, only present on leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Child nodes, only present on directories
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
}

impl Node {
    /// Create a leaf node holding `value`.
    pub fn leaf(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            dir: false,
            value: Some(value.into()),
            nodes: Vec::new(),
        }
    }

    /// Create a directory node with the given children.
    pub fn directory(key: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            key: key.into(),
            dir: true,
            value: None,
            nodes,
        }
    }

    /// Extract the root node from a decoded keys API response.
    ///
    /// v1 answers a directory listing with a bare array, which is wrapped in a
    /// synthetic directory keyed by the requested `key`. v2 always nests the
    /// root under `node`.
    pub fn from_response(
        key: &str,
        body: serde_json::Value,
        api_version: ApiVersion,
    ) -> Result<Self, EtcdError> {
        match api_version {
            ApiVersion::V1 => match body {
                serde_json::Value::Array(nodes) => Ok(Node::directory(
                    key,
                    serde_json::from_value(serde_json::Value::Array(nodes))?,
                )),
                other => Ok(serde_json::from_value(other)?),
            },
            ApiVersion::V2 => match body {
                serde_json::Value::Object(mut map) => {
                    let node = map.remove("node").ok_or(EtcdError::MissingNode)?;
                    Ok(serde_json::from_value(node)?)
                }
                _ => Err(EtcdError::MissingNode),
            },
        }
    }

    /// True when the node carries no `dir` flag.
    pub fn is_leaf(&self) -> bool {
        !self.dir
    }

    /// Child records, empty for leaves.
    pub fn children(&self) -> &[Node] {
        &self.nodes
    }

    pub fn has_children(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Path segments of the key, with empty segments dropped.
    pub fn key_parts(&self) -> Vec<&str> {
        self.key.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Last path segment of the key.
    pub fn key_name(&self) -> Option<&str> {
        self.key_parts().pop()
    }
}
