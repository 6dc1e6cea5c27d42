//! Numeric record ids (`user_id`, `folder_id`, `bubble_id`)

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Positive SERIAL id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(i32);

/// Raw id as sent by clients: the app sends both `12` and `"12"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Parse a path segment or string field.
    ///
    /// # Example
    /// ```
    /// use mementomori_server::models::RecordId;
    ///
    /// assert_eq!(RecordId::parse("id", "42").unwrap().get(), 42);
    /// assert!(RecordId::parse("id", "abc").is_err());
    /// assert!(RecordId::parse("id", "0").is_err());
    /// ```
    pub fn parse(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field });
        }
        let n: i64 = s.parse().map_err(|_| ValidationError::InvalidFormat {
            field,
            reason: "must be a positive integer",
        })?;
        Self::from_i64(field, n)
    }

    /// Convert a JSON id (number or numeric string).
    pub fn from_input(field: &'static str, input: IdInput) -> Result<Self, ValidationError> {
        match input {
            IdInput::Number(n) => Self::from_i64(field, n),
            IdInput::Text(s) => Self::parse(field, &s),
        }
    }

    fn from_i64(field: &'static str, n: i64) -> Result<Self, ValidationError> {
        i32::try_from(n)
            .ok()
            .filter(|id| *id > 0)
            .map(Self)
            .ok_or(ValidationError::InvalidFormat {
                field,
                reason: "must be a positive integer",
            })
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_segments() {
        assert_eq!(RecordId::parse("id", " 7 ").unwrap().get(), 7);
        assert!(matches!(
            RecordId::parse("id", ""),
            Err(ValidationError::Empty { .. })
        ));
        assert!(matches!(
            RecordId::parse("id", "-3"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            RecordId::parse("id", "99999999999"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn accepts_number_or_string_json() {
        let n: IdInput = serde_json::from_str("12").unwrap();
        let s: IdInput = serde_json::from_str(r#""12""#).unwrap();
        assert_eq!(RecordId::from_input("folderId", n).unwrap().get(), 12);
        assert_eq!(RecordId::from_input("folderId", s).unwrap().get(), 12);
    }

    #[test]
    fn rejects_fractional_json() {
        // untagged: 1.5 matches neither i64 nor String
        assert!(serde_json::from_str::<IdInput>("1.5").is_err());
    }
}
