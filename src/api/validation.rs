use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::api::errors::ApiError;
use crate::api::messages;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::BadRequest(messages::PASSWORD_TOO_SHORT.to_string()))
    }
}

/// Runs derive-based validation and surfaces the schema's own message
/// verbatim, without the `field: message` prefix `ValidationErrors`'
/// `Display` adds.
pub(crate) fn check(payload: &impl Validate) -> Result<(), ApiError> {
    payload.validate().map_err(|errors| ApiError::BadRequest(first_message(&errors)))
}

fn first_message(errors: &ValidationErrors) -> String {
    for kind in errors.errors().values() {
        if let ValidationErrorsKind::Field(items) = kind {
            if let Some(error) = items.first() {
                if let Some(message) = &error.message {
                    return message.to_string();
                }
                return error.code.to_string();
            }
        }
    }

    "Permintaan tidak valid".to_string()
}
