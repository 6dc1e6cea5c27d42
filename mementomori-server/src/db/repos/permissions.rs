//! Folder permission repository
//!
//! A permission row grants one user read access to someone else's folder.
//! Read paths for folder contents do not consult this table; only the
//! shared-folder listing and the explicit authorization check do.

use sqlx::{FromRow, PgPool};

use crate::models::{Email, RecordId};
use super::DbError;

/// Permission record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Permission {
    pub folder_id: i32,
    pub user_email: String,
}

/// Folder permission repository
pub struct PermissionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PermissionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Grant `email` access to a folder. A repeat grant is a `Conflict`.
    pub async fn add(&self, folder_id: RecordId, email: &Email) -> Result<Permission, DbError> {
        sqlx::query_as(
            r#"
            INSERT INTO folder_permissions (folder_id, user_email)
            VALUES ($1, $2)
            RETURNING folder_id, user_email
            "#,
        )
        .bind(folder_id.get())
        .bind(email.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            DbError::from_write(e, "permission", "Permission already exists", |constraint| {
                if constraint == "folder_permissions_user_email_fkey" {
                    DbError::not_found("user", email)
                } else {
                    DbError::not_found("folder", folder_id)
                }
            })
        })
    }

    /// Emails granted access to a folder.
    pub async fn list_for_folder(&self, folder_id: RecordId) -> Result<Vec<String>, DbError> {
        let emails = sqlx::query_scalar(
            "SELECT user_email FROM folder_permissions WHERE folder_id = $1 ORDER BY user_email",
        )
        .bind(folder_id.get())
        .fetch_all(self.pool)
        .await?;
        Ok(emails)
    }

    /// Look up a single grant.
    pub async fn find(
        &self,
        folder_id: RecordId,
        email: &Email,
    ) -> Result<Option<Permission>, DbError> {
        let permission = sqlx::query_as(
            r#"
            SELECT folder_id, user_email
            FROM folder_permissions
            WHERE folder_id = $1 AND user_email = $2
            "#,
        )
        .bind(folder_id.get())
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;
        Ok(permission)
    }

    /// Revoke a grant, returning the removed row.
    pub async fn delete(&self, folder_id: RecordId, email: &Email) -> Result<Permission, DbError> {
        sqlx::query_as(
            r#"
            DELETE FROM folder_permissions
            WHERE folder_id = $1 AND user_email = $2
            RETURNING folder_id, user_email
            "#,
        )
        .bind(folder_id.get())
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("permission", format!("{folder_id}/{email}")))
    }
}
