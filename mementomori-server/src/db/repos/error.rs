//! Repository error type and constraint-violation mapping

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource}: {reason}")]
    Conflict {
        resource: &'static str,
        reason: &'static str,
    },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Translate constraint violations raised by a write.
    ///
    /// Unique/primary-key violations become `Conflict` for `resource`.
    /// Foreign-key violations are handed to `missing`, which receives the
    /// violated constraint name and decides which referenced row was absent.
    pub(crate) fn from_write(
        err: sqlx::Error,
        resource: &'static str,
        reason: &'static str,
        missing: impl FnOnce(&str) -> Self,
    ) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return Self::Conflict { resource, reason };
            }
            if db_err.is_foreign_key_violation() {
                let constraint = db_err.constraint().unwrap_or_default().to_owned();
                tracing::debug!(%constraint, "foreign key violation");
                return missing(&constraint);
            }
        }
        Self::Sqlx(err)
    }
}
