//! User repository

use sqlx::{FromRow, PgPool};

use crate::models::{Email, Picture, RecordId, Username};
use super::DbError;

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub profile_picture: Option<Vec<u8>>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Register a user. The email must not be taken.
    pub async fn create(
        &self,
        username: &Username,
        email: &Email,
        picture: Option<&Picture>,
    ) -> Result<User, DbError> {
        sqlx::query_as(
            r#"
            INSERT INTO users (username, email, profile_picture)
            VALUES ($1, $2, $3)
            RETURNING user_id, username, email, profile_picture
            "#,
        )
        .bind(username.as_str())
        .bind(email.as_str())
        .bind(picture.map(Picture::as_bytes))
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            DbError::from_write(e, "user", "email already registered", |_| {
                DbError::not_found("user", email)
            })
        })
    }

    /// Delete a user by id, returning the removed row.
    ///
    /// Folders, bubbles, friendships and permissions go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: RecordId) -> Result<User, DbError> {
        sqlx::query_as(
            r#"
            DELETE FROM users
            WHERE user_id = $1
            RETURNING user_id, username, email, profile_picture
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("user", id))
    }

    /// Whether any user is registered under `email`.
    pub async fn email_exists(&self, email: &Email) -> Result<bool, DbError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(self.pool)
                .await?;
        Ok(exists.0)
    }
}
