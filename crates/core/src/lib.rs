//! Domain building blocks shared by the preference owner service and the
//! notification consumer service.
//!
//! - [`preferences`]: the stored preference snapshot, create input, partial
//!   patch and the merge between them.
//! - [`eligibility`]: pure quiet-hours and per-channel permission checks.
//! - [`envelope`]: the `{ success, data, ... }` wire envelope both services
//!   speak.
//!
//! This crate has zero internal deps so the db, cache and api crates can all
//! build on it.

pub mod channels;
pub mod eligibility;
pub mod envelope;
pub mod error;
pub mod preferences;
pub mod types;
pub mod validation;
