//! Folder name validation

use super::validation::bounded_text;
use super::ValidationError;

/// Maximum folder name length in characters
const MAX_FOLDER_NAME_LEN: usize = 128;

/// Validated folder (album) name.
///
/// Names are not unique per owner; lookups by name pick the oldest folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderName(String);

impl FolderName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text("Folder name", s, MAX_FOLDER_NAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
