//! Friend repository
//!
//! A friendship is two directed rows, (a, b) and (b, a). Both are written
//! and removed in one transaction; an error before commit drops the
//! transaction, which rolls it back.

use sqlx::{FromRow, PgPool};

use crate::models::Email;
use super::DbError;

/// One directed friendship row
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FriendRow {
    pub user_email: String,
    pub friend_email: String,
}

/// Both directions written by an add
#[derive(Debug, Clone)]
pub struct FriendPair {
    pub user_to_friend: FriendRow,
    pub friend_to_user: FriendRow,
}

/// Directions removed by a delete; either side may already have been gone
#[derive(Debug, Clone)]
pub struct RemovedFriendPair {
    pub user_to_friend: Option<FriendRow>,
    pub friend_to_user: Option<FriendRow>,
}

/// Friend entry for list display
#[derive(Debug, Clone, FromRow)]
pub struct FriendWithPicture {
    pub friend_email: String,
    pub profile_picture: Option<Vec<u8>>,
}

/// Friend repository
pub struct FriendRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FriendRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create the friendship in both directions.
    ///
    /// Does not look for an existing friendship first; callers check with
    /// [`FriendRepo::exists`]. A repeat add hits the primary key and
    /// returns `Conflict` with nothing written.
    pub async fn add(&self, user: &Email, friend: &Email) -> Result<FriendPair, DbError> {
        let mut tx = self.pool.begin().await?;

        let user_to_friend = insert_row(&mut tx, user, friend)
            .await
            .map_err(|e| {
                DbError::from_write(e, "friendship", "friendship already exists", |constraint| {
                    if constraint == "friends_friend_email_fkey" {
                        DbError::not_found("user", friend)
                    } else {
                        DbError::not_found("user", user)
                    }
                })
            })?;

        // both emails were checked by the first insert's foreign keys
        let friend_to_user = insert_row(&mut tx, friend, user)
            .await
            .map_err(|e| {
                DbError::from_write(e, "friendship", "friendship already exists", |_| {
                    DbError::not_found("user", friend)
                })
            })?;

        tx.commit().await?;

        tracing::debug!(%user, %friend, "friendship created");
        Ok(FriendPair {
            user_to_friend,
            friend_to_user,
        })
    }

    /// Remove both directions. `NotFound` only when neither existed.
    pub async fn remove(&self, user: &Email, friend: &Email) -> Result<RemovedFriendPair, DbError> {
        let mut tx = self.pool.begin().await?;

        let user_to_friend = delete_row(&mut tx, user, friend).await?;
        let friend_to_user = delete_row(&mut tx, friend, user).await?;

        tx.commit().await?;

        if user_to_friend.is_none() && friend_to_user.is_none() {
            return Err(DbError::not_found("friendship", format!("{user} -> {friend}")));
        }

        if user_to_friend.is_none() || friend_to_user.is_none() {
            tracing::warn!(%user, %friend, "removed one-sided friendship");
        }

        Ok(RemovedFriendPair {
            user_to_friend,
            friend_to_user,
        })
    }

    /// Directional check: does `user` list `friend`?
    pub async fn exists(&self, user: &Email, friend: &Email) -> Result<bool, DbError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM friends WHERE user_email = $1 AND friend_email = $2)",
        )
        .bind(user.as_str())
        .bind(friend.as_str())
        .fetch_one(self.pool)
        .await?;
        Ok(exists.0)
    }

    /// Friends of `user` with their profile pictures.
    pub async fn list(&self, user: &Email) -> Result<Vec<FriendWithPicture>, DbError> {
        let friends = sqlx::query_as(
            r#"
            SELECT f.friend_email, u.profile_picture
            FROM friends f
            JOIN users u ON u.email = f.friend_email
            WHERE f.user_email = $1
            ORDER BY f.friend_email
            "#,
        )
        .bind(user.as_str())
        .fetch_all(self.pool)
        .await?;
        Ok(friends)
    }
}

async fn insert_row(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user: &Email,
    friend: &Email,
) -> Result<FriendRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO friends (user_email, friend_email)
        VALUES ($1, $2)
        RETURNING user_email, friend_email
        "#,
    )
    .bind(user.as_str())
    .bind(friend.as_str())
    .fetch_one(&mut **tx)
    .await
}

async fn delete_row(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user: &Email,
    friend: &Email,
) -> Result<Option<FriendRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        DELETE FROM friends
        WHERE user_email = $1 AND friend_email = $2
        RETURNING user_email, friend_email
        "#,
    )
    .bind(user.as_str())
    .bind(friend.as_str())
    .fetch_optional(&mut **tx)
    .await
}
