//! Folder endpoints
//!
//! Note: folder reads are not gated by folder permissions. Permissions only
//! decide which folders show up under `sharedFolders`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Folder, FolderListing, FolderRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::{required, Email, FolderName, RecordId};

/// Create folder request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub user_email: Option<String>,
    pub folder_name: Option<String>,
}

/// Folder response
#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub folder_id: i32,
    pub user_email: String,
    pub folder_name: String,
}

impl From<Folder> for FolderResponse {
    fn from(f: Folder) -> Self {
        Self {
            folder_id: f.folder_id,
            user_email: f.user_email,
            folder_name: f.folder_name,
        }
    }
}

/// Owned and shared folders for one user
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderListResponse {
    pub user_folders: Vec<FolderResponse>,
    pub shared_folders: Vec<FolderResponse>,
}

impl From<FolderListing> for FolderListResponse {
    fn from(listing: FolderListing) -> Self {
        Self {
            user_folders: listing.owned.into_iter().map(FolderResponse::from).collect(),
            shared_folders: listing.shared.into_iter().map(FolderResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct FolderIdResponse {
    pub folder_id: RecordId,
}

#[derive(Serialize)]
pub struct DeleteFolderResponse {
    pub message: &'static str,
    #[serde(rename = "deletedFolder")]
    pub deleted_folder: FolderResponse,
}

/// POST /folders - create a folder
async fn create_folder(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateFolderRequest>,
) -> Result<Json<FolderResponse>, ApiError> {
    let name = FolderName::new(req.folder_name.as_deref().unwrap_or_default())?;
    let owner = Email::parse("userEmail", &required("userEmail", req.user_email)?)?;

    let folder = FolderRepo::new(&state.pool).create(&owner, &name).await?;

    tracing::info!(folder_id = folder.folder_id, %owner, "folder created");
    Ok(Json(FolderResponse::from(folder)))
}

/// GET /folders/getAll/{email} - folders owned by and shared with a user
async fn list_folders(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<FolderListResponse>, ApiError> {
    let email = Email::new(&email)?;
    let listing = FolderRepo::new(&state.pool).list_for(&email).await?;
    Ok(Json(FolderListResponse::from(listing)))
}

/// GET /folders/getId/{folder} - resolve a folder name to its id
pub(super) async fn folder_id_by_name(
    State(state): State<Arc<AppState>>,
    Path(folder): Path<String>,
) -> Result<Json<FolderIdResponse>, ApiError> {
    let name = FolderName::new(&folder)?;
    let folder_id = FolderRepo::new(&state.pool).id_by_name(&name).await?;
    Ok(Json(FolderIdResponse { folder_id }))
}

/// DELETE /folders/delete/{id} - delete a folder with its bubbles
async fn delete_folder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteFolderResponse>, ApiError> {
    let id = RecordId::parse("id", &id)?;
    let folder = FolderRepo::new(&state.pool).delete(id).await?;

    tracing::info!(folder_id = folder.folder_id, "folder deleted");
    Ok(Json(DeleteFolderResponse {
        message: "Folder deleted successfully",
        deleted_folder: FolderResponse::from(folder),
    }))
}

/// Folder routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/folders", post(create_folder))
        .route("/folders/getAll/{email}", get(list_folders))
        .route("/folders/getId/{folder}", get(folder_id_by_name))
        .route("/folders/delete/{id}", delete(delete_folder))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: i32, owner: &str) -> Folder {
        Folder {
            folder_id: id,
            user_email: owner.into(),
            folder_name: format!("folder {id}"),
        }
    }

    #[test]
    fn listing_serializes_with_client_keys() {
        let listing = FolderListing {
            owned: vec![folder(1, "ada@example.com")],
            shared: vec![folder(2, "bob@example.com")],
        };
        let json = serde_json::to_value(FolderListResponse::from(listing)).unwrap();

        assert_eq!(json["userFolders"][0]["folder_id"], 1);
        assert_eq!(json["sharedFolders"][0]["user_email"], "bob@example.com");
    }

    #[test]
    fn create_request_reads_camel_case() {
        let req: CreateFolderRequest =
            serde_json::from_str(r#"{"userEmail": "ada@example.com", "folderName": "Trips"}"#)
                .unwrap();
        assert_eq!(req.user_email.as_deref(), Some("ada@example.com"));
        assert_eq!(req.folder_name.as_deref(), Some("Trips"));
    }
}
