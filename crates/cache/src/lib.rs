//! Shared read-through cache for preference snapshots and related data.
//!
//! [`CacheBackend`] talks to either an in-process map or Redis and reports
//! every failure as a [`CacheError`]. [`NamespaceCache`] sits on top of it,
//! adds typed JSON values, key prefixes and per-namespace TTLs, and turns
//! those failures into misses and warnings so callers never see them.

pub mod backend;
pub mod config;
pub mod error;
pub mod namespace;

pub use backend::CacheBackend;
pub use config::{CacheConfig, CacheNamespace};
pub use error::CacheError;
pub use namespace::NamespaceCache;
