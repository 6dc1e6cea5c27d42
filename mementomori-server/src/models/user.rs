//! Username validation

use super::validation::bounded_text;
use super::ValidationError;

/// Maximum username length in characters
const MAX_USERNAME_LEN: usize = 64;

/// Validated display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Create a username: trimmed, non-empty, at most 64 characters.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text("username", s, MAX_USERNAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_display_names() {
        assert_eq!(Username::new(" Ada Lovelace ").unwrap().as_str(), "Ada Lovelace");
    }

    #[test]
    fn rejects_blank_and_long() {
        assert!(matches!(Username::new(""), Err(ValidationError::Empty { .. })));
        let long = "x".repeat(65);
        assert!(matches!(
            Username::new(&long),
            Err(ValidationError::TooLong { max: 64, .. })
        ));
    }
}
