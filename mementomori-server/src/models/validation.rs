//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field was not supplied at all
    Missing { field: &'static str },

    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Value doesn't match the required format
    InvalidFormat { field: &'static str, reason: &'static str },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::InvalidFormat { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "Missing {}", field),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {}", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Unwrap an optional request field, reporting it as missing when absent.
///
/// Empty strings are handled by the domain constructors, which report
/// [`ValidationError::Empty`].
pub fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing { field })
}

/// Reject empty/whitespace-only text and enforce a character limit.
pub(crate) fn bounded_text(
    field: &'static str,
    raw: &str,
    max_chars: usize,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max_chars {
        return Err(ValidationError::TooLong {
            field,
            max: max_chars,
        });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::Missing { field: "folderId" };
        assert_eq!(err.to_string(), "Missing folderId");

        let err = ValidationError::TooLong {
            field: "description",
            max: 1024,
        };
        assert_eq!(
            err.to_string(),
            "description exceeds maximum length of 1024"
        );
    }

    #[test]
    fn required_reports_missing_field() {
        assert_eq!(required("user", Some("a@b.c")).unwrap(), "a@b.c");
        let err = required::<String>("friend", None).unwrap_err();
        assert_eq!(err, ValidationError::Missing { field: "friend" });
        assert_eq!(err.field(), "friend");
    }

    #[test]
    fn bounded_text_trims_and_limits() {
        assert_eq!(bounded_text("name", "  trip  ", 8).unwrap(), "trip");
        assert!(matches!(
            bounded_text("name", "   ", 8),
            Err(ValidationError::Empty { .. })
        ));
        assert!(matches!(
            bounded_text("name", "ninechars", 8),
            Err(ValidationError::TooLong { max: 8, .. })
        ));
        // limit counts characters, not bytes
        assert!(bounded_text("name", "ééééé", 5).is_ok());
    }
}
