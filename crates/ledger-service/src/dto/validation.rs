//! Request validation helpers.

use ledger_core::LedgerError;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `LedgerError` on failure.
    fn validate_request(&self) -> Result<(), LedgerError> {
        self.validate().map_err(validation_errors_to_ledger_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator` errors into a single `field: message; ...` string.
#[must_use]
pub fn validation_errors_to_ledger_error(errors: ValidationErrors) -> LedgerError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();
    messages.sort();

    LedgerError::Validation(messages.join("; "))
}
