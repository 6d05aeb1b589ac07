use crate::types::DbId;

/// Domain error taxonomy shared by both services.
///
/// Cache and upstream failures are deliberately absent: they are swallowed
/// where they occur and never reach a caller as an error.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found with {field}: {id}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        id: DbId,
    },

    #[error("{entity} already exists with {field}: {id}")]
    AlreadyExists {
        entity: &'static str,
        field: &'static str,
        id: DbId,
    },

    /// Field-level messages, one per violated constraint (`"field: message"`).
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Not permitted: {0}")]
    NotPermitted(String),
}

impl CoreError {
    /// Shorthand for a single-message validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(vec![message.into()])
    }
}
