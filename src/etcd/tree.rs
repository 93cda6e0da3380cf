//! Flattening of etcd node trees into nested template data.
//!
//! A fetched node tree is turned into a [`KeyTree`] in one pass: the leaves
//! are collected, then each one is inserted at the path spelled by its key
//! segments. The subtree found at the root node's own path is the lookup
//! value.
//!
//! ```text
//! /app            (dir)
//! ├── /app/port   = "8080"
//! └── /app/db     (dir)
//!     └── /app/db/host = "pg"
//!
//! => {"port": "8080", "db": {"host": "pg"}}
//! ```

use serde_json::Value;
use std::collections::BTreeMap;

use super::{EtcdError, Node};

/// Nested mapping mirroring the `/`-delimited key structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyTree {
    /// A stored value; `None` for leaves without one (empty directories).
    Leaf(Option<String>),
    /// A directory keyed by path segment.
    Dir(BTreeMap<String, KeyTree>),
}

impl Default for KeyTree {
    fn default() -> Self {
        KeyTree::Dir(BTreeMap::new())
    }
}

impl KeyTree {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree for `root`.
    ///
    /// With `recursive` every descendant without children becomes a leaf,
    /// whatever its depth. Without it only the immediate children of `root`
    /// are taken, each with its own value. A root without children is itself
    /// the only leaf.
    pub fn from_node(root: &Node, recursive: bool) -> Self {
        let mut leaves = Vec::new();
        collect_leaves(root, recursive, &mut leaves);

        leaves.into_iter().fold(KeyTree::new(), |mut tree, leaf| {
            tree.insert(&leaf.key_parts(), leaf.value.clone());
            tree
        })
    }

    /// Insert `value` at `path`, creating directories along the way.
    ///
    /// The later insertion wins on conflict: a leaf on the way down is turned
    /// into a directory, and a directory at the end of the path is replaced.
    pub fn insert(&mut self, path: &[&str], value: Option<String>) {
        let Some((head, rest)) = path.split_first() else {
            *self = KeyTree::Leaf(value);
            return;
        };

        if let KeyTree::Leaf(_) = self {
            *self = KeyTree::new();
        }

        if let KeyTree::Dir(children) = self {
            children
                .entry((*head).to_string())
                .or_default()
                .insert(rest, value);
        }
    }

    /// Subtree at `path`, if present.
    pub fn get(&self, path: &[&str]) -> Option<&KeyTree> {
        path.iter().try_fold(self, |tree, segment| match tree {
            KeyTree::Dir(children) => children.get(*segment),
            KeyTree::Leaf(_) => None,
        })
    }

    /// Falsy values: missing or empty strings and empty directories.
    pub fn is_empty_value(&self) -> bool {
        match self {
            KeyTree::Leaf(value) => value.as_deref().map_or(true, str::is_empty),
            KeyTree::Dir(children) => children.is_empty(),
        }
    }

    /// Plain JSON rendering of the tree.
    pub fn to_value(&self) -> Value {
        match self {
            KeyTree::Leaf(Some(value)) => Value::String(value.clone()),
            KeyTree::Leaf(None) => Value::Null,
            KeyTree::Dir(children) => Value::Object(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_value()))
                    .collect(),
            ),
        }
    }

    /// JSON rendering used as a lookup result.
    ///
    /// A directory whose entries are all empty is presented as the list of
    /// its key names.
    pub fn to_lookup_value(&self) -> Value {
        match self {
            KeyTree::Dir(children) if children.values().all(KeyTree::is_empty_value) => {
                Value::Array(children.keys().cloned().map(Value::String).collect())
            }
            other => other.to_value(),
        }
    }
}

fn collect_leaves<'a>(node: &'a Node, recursive: bool, leaves: &mut Vec<&'a Node>) {
    if !node.has_children() {
        leaves.push(node);
        return;
    }

    for child in node.children() {
        if recursive {
            collect_leaves(child, recursive, leaves);
        } else {
            leaves.push(child);
        }
    }
}

/// Flatten `root` into the value found at its own path.
pub fn flatten(root: &Node, recursive: bool) -> Result<Value, EtcdError> {
    let tree = KeyTree::from_node(root, recursive);
    tree.get(&root.key_parts())
        .map(KeyTree::to_lookup_value)
        .ok_or_else(|| EtcdError::PathNotFound(root.key.clone()))
}
