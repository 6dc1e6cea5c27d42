//! Bubble description validation

use super::validation::bounded_text;
use super::ValidationError;

/// Maximum description length in characters
const MAX_DESCRIPTION_LEN: usize = 1024;

/// Validated bubble description.
///
/// Descriptions double as a global lookup key (check/delete by
/// description), so they must be unique across all bubbles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text("description", s, MAX_DESCRIPTION_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
