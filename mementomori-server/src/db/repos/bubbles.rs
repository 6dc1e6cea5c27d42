//! Bubble repository
//!
//! Descriptions are globally unique: `create` checks first so the common
//! case gets a clean conflict, and the unique index catches the race.

use sqlx::{FromRow, PgPool};

use crate::models::{Description, Picture, RecordId};
use super::DbError;

const DUPLICATE_DESCRIPTION: &str = "description already in use";

/// Bubble record from database
#[derive(Debug, Clone, FromRow)]
pub struct Bubble {
    pub bubble_id: i32,
    pub folder_id: i32,
    pub bubble_picture: Vec<u8>,
    pub bubble_description: String,
}

/// Bubble repository
pub struct BubbleRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> BubbleRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether any bubble already uses `description`.
    pub async fn description_exists(&self, description: &Description) -> Result<bool, DbError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM bubbles WHERE bubble_description = $1)",
        )
        .bind(description.as_str())
        .fetch_one(self.pool)
        .await?;
        Ok(exists.0)
    }

    /// Add a bubble to a folder.
    pub async fn create(
        &self,
        folder_id: RecordId,
        picture: &Picture,
        description: &Description,
    ) -> Result<Bubble, DbError> {
        if self.description_exists(description).await? {
            return Err(DbError::Conflict {
                resource: "bubble",
                reason: DUPLICATE_DESCRIPTION,
            });
        }

        self.insert(folder_id, picture, description).await
    }

    /// Insert without the description pre-check; the unique index
    /// `bubbles_description_key` still rejects duplicates.
    pub(crate) async fn insert(
        &self,
        folder_id: RecordId,
        picture: &Picture,
        description: &Description,
    ) -> Result<Bubble, DbError> {
        sqlx::query_as(
            r#"
            INSERT INTO bubbles (folder_id, bubble_picture, bubble_description)
            VALUES ($1, $2, $3)
            RETURNING bubble_id, folder_id, bubble_picture, bubble_description
            "#,
        )
        .bind(folder_id.get())
        .bind(picture.as_bytes())
        .bind(description.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            DbError::from_write(e, "bubble", DUPLICATE_DESCRIPTION, |_| {
                DbError::not_found("folder", folder_id)
            })
        })
    }

    /// All bubbles in a folder, oldest first.
    pub async fn list_for_folder(&self, folder_id: RecordId) -> Result<Vec<Bubble>, DbError> {
        let bubbles = sqlx::query_as(
            r#"
            SELECT bubble_id, folder_id, bubble_picture, bubble_description
            FROM bubbles
            WHERE folder_id = $1
            ORDER BY bubble_id
            "#,
        )
        .bind(folder_id.get())
        .fetch_all(self.pool)
        .await?;
        Ok(bubbles)
    }

    /// Descriptions of every bubble in a folder, without image data.
    pub async fn descriptions_for_folder(
        &self,
        folder_id: RecordId,
    ) -> Result<Vec<String>, DbError> {
        let descriptions = sqlx::query_scalar(
            "SELECT bubble_description FROM bubbles WHERE folder_id = $1 ORDER BY bubble_id",
        )
        .bind(folder_id.get())
        .fetch_all(self.pool)
        .await?;
        Ok(descriptions)
    }

    /// Delete by id, returning the removed row.
    pub async fn delete(&self, id: RecordId) -> Result<Bubble, DbError> {
        sqlx::query_as(
            r#"
            DELETE FROM bubbles
            WHERE bubble_id = $1
            RETURNING bubble_id, folder_id, bubble_picture, bubble_description
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("bubble", id))
    }

    /// Delete by description, returning the removed row.
    pub async fn delete_by_description(
        &self,
        description: &Description,
    ) -> Result<Bubble, DbError> {
        sqlx::query_as(
            r#"
            DELETE FROM bubbles
            WHERE bubble_description = $1
            RETURNING bubble_id, folder_id, bubble_picture, bubble_description
            "#,
        )
        .bind(description.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("bubble", description.as_str()))
    }
}
