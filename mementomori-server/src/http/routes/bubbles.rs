//! Bubble (photo post) endpoints
//!
//! Bubble reads are not gated by folder permissions.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::folders::folder_id_by_name;
use crate::db::repos::{Bubble, BubbleRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, BubbleForm, PictureInput};
use crate::http::server::AppState;
use crate::models::{required, to_data_uri, Description, Picture, RecordId, ValidationError};

/// Bubble response
#[derive(Debug, Serialize)]
pub struct BubbleResponse {
    pub bubble_id: i32,
    pub folder_id: i32,
    pub description: String,
    /// Image as a data URI
    pub image: String,
}

impl From<Bubble> for BubbleResponse {
    fn from(b: Bubble) -> Self {
        Self {
            bubble_id: b.bubble_id,
            folder_id: b.folder_id,
            image: to_data_uri(&b.bubble_picture),
            description: b.bubble_description,
        }
    }
}

#[derive(Deserialize)]
pub struct DescriptionRequest {
    pub description: Option<String>,
}

#[derive(Serialize)]
pub struct UniqueResponse {
    pub unique: bool,
}

#[derive(Serialize)]
pub struct DescriptionItem {
    pub bubble_description: String,
}

#[derive(Serialize)]
pub struct DeleteBubbleResponse {
    pub message: &'static str,
    #[serde(rename = "deletedBubble")]
    pub deleted_bubble: BubbleResponse,
}

fn decode_picture(input: PictureInput) -> Result<Picture, ValidationError> {
    match input {
        PictureInput::Base64(text) => Picture::from_base64("picture", &text),
        PictureInput::Bytes(bytes) => Picture::from_bytes("picture", bytes),
    }
}

async fn insert_bubble(
    state: &AppState,
    folder_id: RecordId,
    picture: Picture,
    description: Description,
) -> Result<Json<BubbleResponse>, ApiError> {
    let bubble = BubbleRepo::new(&state.pool)
        .create(folder_id, &picture, &description)
        .await?;

    tracing::info!(
        bubble_id = bubble.bubble_id,
        folder_id = bubble.folder_id,
        bytes = bubble.bubble_picture.len(),
        "bubble created"
    );
    Ok(Json(BubbleResponse::from(bubble)))
}

/// POST /bubbles - create a bubble (`id` is the folder id)
async fn create_bubble(
    State(state): State<Arc<AppState>>,
    form: BubbleForm,
) -> Result<Json<BubbleResponse>, ApiError> {
    let folder_id = RecordId::from_input("id", required("id", form.id)?)?;
    let picture = decode_picture(required("picture", form.picture)?)?;
    let description = Description::new(&required("description", form.description)?)?;

    insert_bubble(&state, folder_id, picture, description).await
}

/// POST /bubbles/upload - create a bubble from JSON or multipart form data
async fn upload_bubble(
    State(state): State<Arc<AppState>>,
    form: BubbleForm,
) -> Result<Json<BubbleResponse>, ApiError> {
    let folder_id = RecordId::from_input("id", required("id", form.id)?)?;
    let description = Description::new(&required("description", form.description)?)?;
    let picture = decode_picture(required("picture", form.picture)?)?;

    insert_bubble(&state, folder_id, picture, description).await
}

/// POST /bubbles/check-description - is this description still free?
async fn check_description(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DescriptionRequest>,
) -> Result<Json<UniqueResponse>, ApiError> {
    let description = Description::new(&required("description", req.description)?)?;
    let taken = BubbleRepo::new(&state.pool)
        .description_exists(&description)
        .await?;
    Ok(Json(UniqueResponse { unique: !taken }))
}

/// GET /bubbles/getBubbles/{id} - all bubbles in a folder with images
async fn list_bubbles(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BubbleResponse>>, ApiError> {
    let folder_id = RecordId::parse("id", &id)?;
    let bubbles = BubbleRepo::new(&state.pool)
        .list_for_folder(folder_id)
        .await?;

    if bubbles.is_empty() {
        return Err(ApiError::not_found("bubbles for folder", folder_id));
    }

    Ok(Json(bubbles.into_iter().map(BubbleResponse::from).collect()))
}

/// GET /bubbles/getDescriptions/{id} - bubble descriptions in a folder
async fn list_descriptions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<DescriptionItem>>, ApiError> {
    let folder_id = RecordId::parse("id", &id)?;
    let descriptions = BubbleRepo::new(&state.pool)
        .descriptions_for_folder(folder_id)
        .await?;

    Ok(Json(
        descriptions
            .into_iter()
            .map(|bubble_description| DescriptionItem { bubble_description })
            .collect(),
    ))
}

/// DELETE /bubbles/delete/{id} - delete one bubble by id
async fn delete_bubble(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteBubbleResponse>, ApiError> {
    let id = RecordId::parse("id", &id)?;
    let bubble = BubbleRepo::new(&state.pool).delete(id).await?;

    tracing::info!(bubble_id = bubble.bubble_id, "bubble deleted");
    Ok(Json(DeleteBubbleResponse {
        message: "Bubble deleted successfully",
        deleted_bubble: BubbleResponse::from(bubble),
    }))
}

/// DELETE /bubbles/delete-by-description - delete one bubble by description
async fn delete_by_description(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<DescriptionRequest>,
) -> Result<Json<DeleteBubbleResponse>, ApiError> {
    let description = Description::new(&required("description", req.description)?)?;
    let bubble = BubbleRepo::new(&state.pool)
        .delete_by_description(&description)
        .await?;

    tracing::info!(bubble_id = bubble.bubble_id, "bubble deleted by description");
    Ok(Json(DeleteBubbleResponse {
        message: "Bubble deleted successfully",
        deleted_bubble: BubbleResponse::from(bubble),
    }))
}

/// Bubble routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bubbles", post(create_bubble))
        .route("/bubbles/upload", post(upload_bubble))
        .route("/bubbles/check-description", post(check_description))
        .route("/bubbles/getBubbles/{id}", get(list_bubbles))
        .route("/bubbles/getDescriptions/{id}", get(list_descriptions))
        .route("/bubbles/getId/{folder}", get(folder_id_by_name))
        .route("/bubbles/delete/{id}", delete(delete_bubble))
        .route("/bubbles/delete-by-description", delete(delete_by_description))
}
