//! # rustible-etcd - etcd Lookups for Rustible
//!
//! Resolves template variables from an etcd key space. A key is fetched,
//! optionally together with its whole subtree, and the returned node tree is
//! flattened into a scalar or a nested mapping keyed by path segments.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 Host runtime / rustible-etcd CLI                     │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │ terms, options
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              LookupRegistry  ──►  EtcdLookup (plugin)                │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │ key, recursive
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │        EtcdClient  (GET {host}/{version}/keys/{key})                 │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │ node tree
//!                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │        KeyTree flattening  ──►  serde_json::Value                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use rustible_etcd::prelude::*;
//!
//! let registry = LookupRegistry::with_builtins();
//! let context = LookupContext::new().with_url("http://127.0.0.1:4001");
//!
//! for item in registry.lookup("etcd", &["/app"], &context)? {
//!     println!("{}", item);
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    // Error handling
    pub use crate::error::{Error, Result};

    // Configuration
    pub use crate::config::{Config, EtcdConfig};

    // Store client
    pub use crate::etcd::{ApiVersion, EtcdClient, EtcdError, KeyTree, Node};

    // Lookup plugins
    pub use crate::plugins::lookup::prelude::*;
}

// ============================================================================
// Core Modules
// ============================================================================

/// Error types and result aliases.
pub mod error;

/// Configuration loading from files and environment variables.
pub mod config;

/// Logging initialisation on top of `tracing-subscriber`.
pub mod logging;

// ============================================================================
// etcd Access
// ============================================================================

/// etcd keys API client and node tree flattening.
pub mod etcd;

// ============================================================================
// Plugins
// ============================================================================

/// Lookup plugin framework and the etcd lookup.
pub mod plugins;

// ============================================================================
// Version Information
// ============================================================================

/// Returns the current version of rustible-etcd.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
