//! OAuth token cache endpoints
//!
//! Token values are never logged.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;
use crate::models::{required, Email, ValidationError};
use crate::tokens::TOKEN_TTL;

#[derive(Deserialize)]
pub struct StoreTokenRequest {
    pub token: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct RetrieveTokenQuery {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct StoreTokenResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /auth/store-token - cache a token for seven days
async fn store_token(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<StoreTokenRequest>,
) -> Result<Json<StoreTokenResponse>, ApiError> {
    let token = required("token", req.token)?;
    if token.trim().is_empty() {
        return Err(ValidationError::Empty { field: "token" }.into());
    }
    let email = Email::new(&required("email", req.email)?)?;

    state.tokens.store(email.as_str(), &token, TOKEN_TTL).await?;

    tracing::info!(%email, "token stored");
    Ok(Json(StoreTokenResponse {
        message: "Token stored successfully",
    }))
}

/// GET /auth/retrieve-token?email= - fetch a live token
async fn retrieve_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RetrieveTokenQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = Email::new(&required("email", query.email)?)?;

    let token = state
        .tokens
        .fetch(email.as_str())
        .await?
        .ok_or_else(|| ApiError::not_found("token", &email))?;

    tracing::debug!(%email, "token retrieved");
    Ok(Json(TokenResponse { token }))
}

/// Token cache routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/store-token", post(store_token))
        .route("/auth/retrieve-token", get(retrieve_token))
}
