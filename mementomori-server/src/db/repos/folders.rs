//! Folder repository
//!
//! - list: owned and shared folders in one query, partitioned in Rust
//! - lookup by name: oldest match wins, names are not unique

use sqlx::{FromRow, PgPool};

use crate::models::{Email, FolderName, RecordId};
use super::DbError;

/// Folder record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Folder {
    pub folder_id: i32,
    pub user_email: String,
    pub folder_name: String,
}

/// Folders visible to one user
#[derive(Debug, Clone, Default)]
pub struct FolderListing {
    /// Folders the user owns
    pub owned: Vec<Folder>,
    /// Folders owned by someone else and shared through a permission
    pub shared: Vec<Folder>,
}

/// Listing row: the folder plus whether the caller owns it
#[derive(FromRow)]
struct FolderRow {
    #[sqlx(flatten)]
    folder: Folder,
    owned: bool,
}

/// Folder repository
pub struct FolderRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FolderRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a folder owned by `owner`.
    pub async fn create(&self, owner: &Email, name: &FolderName) -> Result<Folder, DbError> {
        sqlx::query_as(
            r#"
            INSERT INTO folders (user_email, folder_name)
            VALUES ($1, $2)
            RETURNING folder_id, user_email, folder_name
            "#,
        )
        .bind(owner.as_str())
        .bind(name.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            DbError::from_write(e, "folder", "folder already exists", |_| {
                DbError::not_found("user", owner)
            })
        })
    }

    /// List folders owned by or shared with `email`.
    ///
    /// Each folder row is selected once, so a folder can't land in both
    /// lists even if its owner was also granted a permission on it.
    pub async fn list_for(&self, email: &Email) -> Result<FolderListing, DbError> {
        let rows: Vec<FolderRow> = sqlx::query_as(
            r#"
            SELECT
                f.folder_id,
                f.user_email,
                f.folder_name,
                f.user_email = $1 AS owned
            FROM folders f
            WHERE f.user_email = $1
               OR EXISTS (
                    SELECT 1 FROM folder_permissions p
                    WHERE p.folder_id = f.folder_id AND p.user_email = $1
               )
            ORDER BY f.folder_id
            "#,
        )
        .bind(email.as_str())
        .fetch_all(self.pool)
        .await?;

        let mut listing = FolderListing::default();
        for row in rows {
            if row.owned {
                listing.owned.push(row.folder);
            } else {
                listing.shared.push(row.folder);
            }
        }

        Ok(listing)
    }

    /// Resolve a folder name to an id. Lowest id wins on duplicates.
    pub async fn id_by_name(&self, name: &FolderName) -> Result<RecordId, DbError> {
        let id: Option<i32> = sqlx::query_scalar(
            "SELECT folder_id FROM folders WHERE folder_name = $1 ORDER BY folder_id LIMIT 1",
        )
        .bind(name.as_str())
        .fetch_optional(self.pool)
        .await?;

        id.map(RecordId::from)
            .ok_or_else(|| DbError::not_found("folder", name.as_str()))
    }

    /// Delete a folder, returning the removed row. Bubbles and permissions cascade.
    pub async fn delete(&self, id: RecordId) -> Result<Folder, DbError> {
        sqlx::query_as(
            r#"
            DELETE FROM folders
            WHERE folder_id = $1
            RETURNING folder_id, user_email, folder_name
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("folder", id))
    }
}
