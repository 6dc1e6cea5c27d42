//! Friend endpoints
//!
//! Friendships are symmetric. Add and delete touch both directions in one
//! transaction; the existence check is directional.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::checks::ExistsResponse;
use crate::db::repos::{FriendPair, FriendRepo, FriendRow, FriendWithPicture, RemovedFriendPair};
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::{required, to_data_uri, Email};

/// Add/delete friend request
#[derive(Deserialize)]
pub struct FriendRequest {
    pub user: Option<String>,
    pub friend: Option<String>,
}

impl FriendRequest {
    fn into_emails(self) -> Result<(Email, Email), ApiError> {
        let user = Email::parse("user", &required("user", self.user)?)?;
        let friend = Email::parse("friend", &required("friend", self.friend)?)?;
        Ok((user, friend))
    }
}

#[derive(Debug, Serialize)]
pub struct FriendRowResponse {
    pub user_email: String,
    pub friend_email: String,
}

impl From<FriendRow> for FriendRowResponse {
    fn from(row: FriendRow) -> Self {
        Self {
            user_email: row.user_email,
            friend_email: row.friend_email,
        }
    }
}

/// Both directions of a friendship; a side is null when it was absent
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendPairResponse {
    pub user_to_friend: Option<FriendRowResponse>,
    pub friend_to_user: Option<FriendRowResponse>,
}

impl From<FriendPair> for FriendPairResponse {
    fn from(pair: FriendPair) -> Self {
        Self {
            user_to_friend: Some(pair.user_to_friend.into()),
            friend_to_user: Some(pair.friend_to_user.into()),
        }
    }
}

impl From<RemovedFriendPair> for FriendPairResponse {
    fn from(pair: RemovedFriendPair) -> Self {
        Self {
            user_to_friend: pair.user_to_friend.map(Into::into),
            friend_to_user: pair.friend_to_user.map(Into::into),
        }
    }
}

#[derive(Serialize)]
pub struct FriendChangeResponse {
    pub message: &'static str,
    pub data: FriendPairResponse,
}

#[derive(Serialize)]
pub struct FriendEntry {
    pub friend_email: String,
    /// Profile picture as a data URI
    pub picture: Option<String>,
}

impl From<FriendWithPicture> for FriendEntry {
    fn from(f: FriendWithPicture) -> Self {
        Self {
            picture: f.profile_picture.as_deref().map(to_data_uri),
            friend_email: f.friend_email,
        }
    }
}

#[derive(Serialize)]
pub struct FriendListResponse {
    pub friends: Vec<FriendEntry>,
}

/// POST /friends/add - befriend another user
async fn add_friend(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<FriendRequest>,
) -> Result<(StatusCode, Json<FriendChangeResponse>), ApiError> {
    let (user, friend) = req.into_emails()?;
    if user == friend {
        return Err(ApiError::BadRequest {
            message: "A user cannot befriend themselves".into(),
        });
    }

    let pair = FriendRepo::new(&state.pool).add(&user, &friend).await?;

    tracing::info!(%user, %friend, "friend added");
    Ok((
        StatusCode::CREATED,
        Json(FriendChangeResponse {
            message: "Friend added successfully",
            data: pair.into(),
        }),
    ))
}

/// DELETE /friends/delete - remove a friendship in both directions
async fn delete_friend(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<FriendRequest>,
) -> Result<Json<FriendChangeResponse>, ApiError> {
    let (user, friend) = req.into_emails()?;
    let removed = FriendRepo::new(&state.pool).remove(&user, &friend).await?;

    tracing::info!(%user, %friend, "friend deleted");
    Ok(Json(FriendChangeResponse {
        message: "Friend deleted successfully",
        data: removed.into(),
    }))
}

/// GET /friends/friendship/{user}/{friend} - does `user` list `friend`?
async fn friendship_exists(
    State(state): State<Arc<AppState>>,
    Path((user, friend)): Path<(String, String)>,
) -> Result<Json<ExistsResponse>, ApiError> {
    let user = Email::parse("user", &user)?;
    let friend = Email::parse("friend", &friend)?;
    let exists = FriendRepo::new(&state.pool).exists(&user, &friend).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// GET /friends/friends/{user} - a user's friends with their pictures
async fn list_friends(
    State(state): State<Arc<AppState>>,
    Path(user): Path<String>,
) -> Result<Json<FriendListResponse>, ApiError> {
    let user = Email::parse("user", &user)?;
    let friends = FriendRepo::new(&state.pool).list(&user).await?;
    Ok(Json(FriendListResponse {
        friends: friends.into_iter().map(FriendEntry::from).collect(),
    }))
}

/// Friend routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/friends/add", post(add_friend))
        .route("/friends/delete", delete(delete_friend))
        .route("/friends/friendship/{user}/{friend}", get(friendship_exists))
        .route("/friends/friends/{user}", get(list_friends))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user: &str, friend: &str) -> FriendRow {
        FriendRow {
            user_email: user.into(),
            friend_email: friend.into(),
        }
    }

    #[test]
    fn one_sided_removal_serializes_null() {
        let removed = RemovedFriendPair {
            user_to_friend: Some(row("ada@example.com", "bob@example.com")),
            friend_to_user: None,
        };
        let json = serde_json::to_value(FriendPairResponse::from(removed)).unwrap();
        assert_eq!(json["userToFriend"]["friend_email"], "bob@example.com");
        assert!(json["friendToUser"].is_null());
    }

    #[test]
    fn missing_friend_reported_after_user() {
        let req = FriendRequest {
            user: None,
            friend: None,
        };
        let err = req.into_emails().err().expect("should reject");
        assert!(matches!(err, ApiError::Validation(ref e) if e.field() == "user"));
    }

    #[test]
    fn entry_without_picture() {
        let entry = FriendEntry::from(FriendWithPicture {
            friend_email: "bob@example.com".into(),
            profile_picture: None,
        });
        assert!(entry.picture.is_none());
    }
}
