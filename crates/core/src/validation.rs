//! Conversion of `validator` derive results into [`CoreError::Validation`].

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Flatten `validator` errors into sorted `"field: message"` strings.
///
/// Falls back to the constraint code when a rule carries no message.
pub fn field_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let detail = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {detail}")
            })
        })
        .collect();
    messages.sort();
    messages
}

/// Run derive-based validation and map failures into the domain error.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(field_messages(&e)))
}
