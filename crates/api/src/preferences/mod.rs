//! Owner side: durable preference records behind a cache-aside layer.

pub mod service;
pub mod store;

pub use service::PreferenceService;
pub use store::{PgPreferenceStore, PreferenceStore};
