//! Existence checks used by the client before sign-up

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::repos::UserRepo;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::Email;

#[derive(Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// GET /checks/email/{email} - is this email registered?
async fn email_exists(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<ExistsResponse>, ApiError> {
    let email = Email::new(&email)?;
    let exists = UserRepo::new(&state.pool).email_exists(&email).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// Check routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/checks/email/{email}", get(email_exists))
}
