//! User endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::{required, to_data_uri, Email, Picture, RecordId, Username};

/// Create user request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    /// Base64 profile picture; may be omitted
    pub picture: Option<String>,
}

/// User response
#[derive(Serialize)]
pub struct UserResponse {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    /// Profile picture as a data URI
    pub picture: Option<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            username: u.username,
            email: u.email,
            picture: u.profile_picture.as_deref().map(to_data_uri),
        }
    }
}

#[derive(Serialize)]
pub struct DeleteUserResponse {
    pub message: &'static str,
    #[serde(rename = "deletedUser")]
    pub deleted_user: UserResponse,
}

/// POST /users - register a user
async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let username = Username::new(&required("username", req.username)?)?;
    let email = Email::new(&required("email", req.email)?)?;
    let picture = req
        .picture
        .filter(|p| !p.trim().is_empty())
        .map(|p| Picture::from_base64("picture", &p))
        .transpose()?;

    let user = UserRepo::new(&state.pool)
        .create(&username, &email, picture.as_ref())
        .await?;

    tracing::info!(user_id = user.user_id, %email, "user created");
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/delete/{id} - delete a user and everything they own
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    let id = RecordId::parse("id", &id)?;
    let user = UserRepo::new(&state.pool).delete(id).await?;

    tracing::info!(user_id = user.user_id, "user deleted");
    Ok(Json(DeleteUserResponse {
        message: "User deleted successfully",
        deleted_user: UserResponse::from(user),
    }))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/delete/{id}", delete(delete_user))
}
