//! Folder permission endpoints
//!
//! `GET /permissions/check` is the explicit authorization check. Folder and
//! bubble reads do not call it.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Permission, PermissionRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::{required, Email, IdInput, RecordId};

/// Permission request body
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRequest {
    pub folder_id: Option<IdInput>,
    pub user_email: Option<String>,
}

impl PermissionRequest {
    fn validate(self) -> Result<(RecordId, Email), ApiError> {
        let folder_id = RecordId::from_input("folderId", required("folderId", self.folder_id)?)?;
        let email = Email::parse("userEmail", &required("userEmail", self.user_email)?)?;
        Ok((folder_id, email))
    }
}

/// Query string for the authorization check
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationQuery {
    pub folder_id: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub folder_id: i32,
    pub user_email: String,
}

impl From<Permission> for PermissionResponse {
    fn from(p: Permission) -> Self {
        Self {
            folder_id: p.folder_id,
            user_email: p.user_email,
        }
    }
}

#[derive(Serialize)]
pub struct PermissionChangeResponse {
    pub message: &'static str,
    pub data: PermissionResponse,
}

#[derive(Serialize)]
pub struct GranteeResponse {
    pub user_email: String,
}

#[derive(Serialize)]
pub struct CheckResponse {
    pub message: &'static str,
}

/// POST /permissions/add - grant a user access to a folder
async fn add_permission(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PermissionRequest>,
) -> Result<(StatusCode, Json<PermissionChangeResponse>), ApiError> {
    let (folder_id, email) = req.validate()?;
    let permission = PermissionRepo::new(&state.pool).add(folder_id, &email).await?;

    tracing::info!(%folder_id, %email, "permission added");
    Ok((
        StatusCode::CREATED,
        Json(PermissionChangeResponse {
            message: "Permission added successfully",
            data: permission.into(),
        }),
    ))
}

/// GET /permissions/get/{folderId} - everyone a folder is shared with
async fn list_permissions(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<String>,
) -> Result<Json<Vec<GranteeResponse>>, ApiError> {
    let folder_id = RecordId::parse("folderId", &folder_id)?;
    let emails = PermissionRepo::new(&state.pool)
        .list_for_folder(folder_id)
        .await?;

    if emails.is_empty() {
        return Err(ApiError::not_found("permissions for folder", folder_id));
    }

    Ok(Json(
        emails
            .into_iter()
            .map(|user_email| GranteeResponse { user_email })
            .collect(),
    ))
}

/// POST /permissions/check - 409 when the grant already exists
async fn check_permission(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PermissionRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    let (folder_id, email) = req.validate()?;

    if PermissionRepo::new(&state.pool)
        .find(folder_id, &email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict {
            message: "Permission already exists".into(),
        });
    }

    Ok(Json(CheckResponse {
        message: "Permission does not exist",
    }))
}

/// DELETE /permissions/delete - revoke a grant
async fn delete_permission(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PermissionRequest>,
) -> Result<Json<PermissionChangeResponse>, ApiError> {
    let (folder_id, email) = req.validate()?;
    let permission = PermissionRepo::new(&state.pool)
        .delete(folder_id, &email)
        .await?;

    tracing::info!(%folder_id, %email, "permission deleted");
    Ok(Json(PermissionChangeResponse {
        message: "Permission deleted successfully",
        data: permission.into(),
    }))
}

/// GET /permissions/check?folderId=&userEmail= - 403 unless the grant exists
async fn is_authorized(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthorizationQuery>,
) -> Result<Json<PermissionChangeResponse>, ApiError> {
    let folder_id = RecordId::parse("folderId", &required("folderId", query.folder_id)?)?;
    let email = Email::parse("userEmail", &required("userEmail", query.user_email)?)?;

    let permission = PermissionRepo::new(&state.pool)
        .find(folder_id, &email)
        .await?
        .ok_or_else(|| ApiError::Forbidden {
            reason: "User is not authorized".into(),
        })?;

    Ok(Json(PermissionChangeResponse {
        message: "User is authorized",
        data: permission.into(),
    }))
}

/// Permission routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/permissions/add", post(add_permission))
        .route("/permissions/get/{folder_id}", get(list_permissions))
        .route(
            "/permissions/check",
            post(check_permission).get(is_authorized),
        )
        .route("/permissions/delete", delete(delete_permission))
}
