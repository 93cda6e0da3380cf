//! Plugin System for rustible-etcd
//!
//! # Lookup Plugins
//!
//! Plugins for retrieving data from external sources during playbook execution.
//! This crate ships the `etcd` lookup; see the [`lookup`] module.
//!
//! # Creating Custom Lookups
//!
//! Implement the [`lookup::LookupPlugin`] trait and register the plugin with a
//! [`lookup::LookupRegistry`]:
//!
//! ```rust,ignore
//! use rustible_etcd::plugins::lookup::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct MyLookup;
//!
//! impl LookupPlugin for MyLookup {
//!     fn name(&self) -> &'static str { "my_lookup" }
//!     fn description(&self) -> &'static str { "My custom lookup" }
//!     fn lookup(
//!         &self,
//!         terms: &LookupTerms,
//!         options: &LookupOptions,
//!         context: &LookupContext,
//!     ) -> LookupResult<Vec<serde_json::Value>> {
//!         Ok(vec![])
//!     }
//! }
//!
//! let mut registry = LookupRegistry::with_builtins();
//! registry.register(MyLookup);
//! ```

pub mod lookup;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use super::lookup::prelude::*;
}
