//! Input validation for messages and credentials.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A message needs text content or an image.
    EmptyMessage,
    /// Empty value where one is required.
    Empty(&'static str),
    /// Value shorter than the required minimum.
    TooShort {
        field: &'static str,
        min: usize,
        actual: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyMessage => {
                write!(f, "message content and image cannot both be empty")
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooShort { field, min, actual } => {
                write!(f, "{} is too short ({} chars, min {})", field, actual, min)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Minimum password length for registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A message must carry text content or an image reference; both fields
/// empty is rejected before anything is written.
pub fn validate_message_body(
    content: &str,
    image: Option<&str>,
) -> Result<(), ValidationError> {
    if content.is_empty() && image.map_or(true, str::is_empty) {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(())
}

/// Validate a phone number used as a login name.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() {
        return Err(ValidationError::Empty("phone"));
    }
    Ok(())
}

/// Validate a registration password.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Empty("password"));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password",
            min: MIN_PASSWORD_LENGTH,
            actual: password.chars().count(),
        });
    }
    Ok(())
}
