//! Response middleware shared by both services.
//!
//! - [`error_path::attach_error_path`] -- Stamps the request path into error envelopes.

pub mod error_path;
