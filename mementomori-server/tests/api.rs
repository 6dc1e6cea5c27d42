//! Router-level tests.
//!
//! The pool connects lazily and every request here is rejected or answered
//! before a query runs, so no database is needed. The `#[ignore]`d tests at
//! the bottom walk full flows against a real database:
//!
//! DATABASE_URL=postgres://... cargo test -p mementomori-server -- --ignored

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use mementomori_server::{build_router, migrate, AppState, MemoryTokenStore, ServerConfig};

fn lazy_state() -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/mementomori_unused")
        .expect("lazy pool");
    AppState::new(pool, Arc::new(MemoryTokenStore::new()))
}

fn app() -> Router {
    build_router(lazy_state(), &ServerConfig::default())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_and_banner() {
    let app = app();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "mementomori");

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("mementomori"));
}

#[tokio::test]
async fn user_create_reports_first_missing_field() {
    let app = app();

    let (status, body) = send(&app, json_request("POST", "/users", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing username");

    let (status, body) =
        send(&app, json_request("POST", "/users", json!({"username": "ada"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing email");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app();
    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn non_numeric_ids_are_rejected() {
    let app = app();

    for uri in [
        "/users/delete/abc",
        "/folders/delete/abc",
        "/bubbles/delete/abc",
    ] {
        let req = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }

    let (status, _) = send(&app, get("/bubbles/getBubbles/-3")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn folder_create_requires_name() {
    let app = app();
    let (status, body) = send(
        &app,
        json_request("POST", "/folders", json!({"userEmail": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Folder name cannot be empty");
}

#[tokio::test]
async fn bubble_routes_check_fields_in_their_own_order() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request("POST", "/bubbles", json!({"id": 1, "description": "pier"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing picture");

    let (status, body) = send(
        &app,
        json_request("POST", "/bubbles/upload", json!({"id": "1", "picture": "/9j/2w=="})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing description");

    let (status, body) = send(
        &app,
        json_request("POST", "/bubbles/upload", json!({"description": "pier"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing id");
}

#[tokio::test]
async fn bubble_picture_must_be_base64() {
    let app = app();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/bubbles",
            json!({"id": 1, "description": "pier", "picture": "%%% not base64 %%%"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn cannot_befriend_self() {
    let app = app();
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/friends/add",
            json!({"user": "ada@example.com", "friend": "ada@example.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request("POST", "/friends/add", json!({"user": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing friend");
}

#[tokio::test]
async fn permission_check_requires_folder_id_first() {
    let app = app();

    let (status, body) = send(&app, get("/permissions/check")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing folderId");

    let (status, body) = send(&app, get("/permissions/check?folderId=4")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing userEmail");

    let (status, body) = send(
        &app,
        json_request("POST", "/permissions/add", json!({"userEmail": "bob@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing folderId");
}

#[tokio::test]
async fn token_round_trip() {
    let app = app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/auth/store-token",
            json!({"token": "ya29.secret", "email": "ada@example.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Token stored successfully");

    let (status, body) = send(&app, get("/auth/retrieve-token?email=ada@example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "ya29.secret");
}

#[tokio::test]
async fn token_lookup_errors() {
    let app = app();

    let (status, _) = send(&app, get("/auth/retrieve-token?email=nobody@example.com")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/auth/retrieve-token")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing email");

    let (status, body) = send(
        &app,
        json_request("POST", "/auth/store-token", json!({"email": "ada@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing token");
}

#[tokio::test]
async fn oversized_body_is_413() {
    let config = ServerConfig {
        body_limit: 64,
        ..ServerConfig::default()
    };
    let app = build_router(lazy_state(), &config);

    let padding = "x".repeat(256);
    let (status, _) = send(
        &app,
        json_request("POST", "/users", json!({"username": padding})),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

// ---------------------------------------------------------------------------
// Database-backed flows
// ---------------------------------------------------------------------------

async fn db_app() -> Router {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect");
    migrate(&pool).await.expect("migrate");
    build_router(
        AppState::new(pool, Arc::new(MemoryTokenStore::new())),
        &ServerConfig::default(),
    )
}

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

async fn create_user(app: &Router, prefix: &str) -> String {
    let email = format!("{}@example.com", unique(prefix));
    let (status, _) = send(
        app,
        json_request("POST", "/users", json!({"username": prefix, "email": email})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    email
}

async fn create_folder(app: &Router, owner: &str) -> (i64, String) {
    let name = unique("folder");
    let (status, body) = send(
        app,
        json_request("POST", "/folders", json!({"userEmail": owner, "folderName": name})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (body["folder_id"].as_i64().unwrap(), name)
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_email_conflicts() {
    let app = db_app().await;
    let email = create_user(&app, "dup").await;

    let (status, _) = send(
        &app,
        json_request("POST", "/users", json!({"username": "again", "email": email})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, get(&format!("/checks/email/{email}"))).await;
    assert_eq!(body["exists"], true);
}

#[tokio::test]
#[ignore = "requires database"]
async fn friendship_is_symmetric() {
    let app = db_app().await;
    let ada = create_user(&app, "ada").await;
    let bob = create_user(&app, "bob").await;
    let pair = json!({"user": ada, "friend": bob});

    let (status, body) = send(&app, json_request("POST", "/friends/add", pair.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["friendToUser"]["user_email"], bob.as_str());

    for (a, b) in [(&ada, &bob), (&bob, &ada)] {
        let (_, body) = send(&app, get(&format!("/friends/friendship/{a}/{b}"))).await;
        assert_eq!(body["exists"], true);
    }

    let (status, _) = send(&app, json_request("POST", "/friends/add", pair.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, get(&format!("/friends/friends/{ada}"))).await;
    assert_eq!(body["friends"][0]["friend_email"], bob.as_str());

    let (status, _) = send(&app, json_request("DELETE", "/friends/delete", pair.clone())).await;
    assert_eq!(status, StatusCode::OK);

    for (a, b) in [(&ada, &bob), (&bob, &ada)] {
        let (_, body) = send(&app, get(&format!("/friends/friendship/{a}/{b}"))).await;
        assert_eq!(body["exists"], false);
    }

    let (status, _) = send(&app, json_request("DELETE", "/friends/delete", pair)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn permission_lifecycle() {
    let app = db_app().await;
    let owner = create_user(&app, "owner").await;
    let guest = create_user(&app, "guest").await;
    let (folder_id, _) = create_folder(&app, &owner).await;
    let grant = json!({"folderId": folder_id, "userEmail": guest});

    let check = format!("/permissions/check?folderId={folder_id}&userEmail={guest}");
    let (status, _) = send(&app, get(&check)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, json_request("POST", "/permissions/check", grant.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, json_request("POST", "/permissions/add", grant.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        send(&app, json_request("POST", "/permissions/check", grant.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Permission already exists");

    let (status, _) = send(&app, json_request("POST", "/permissions/add", grant.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, get(&check)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get(&format!("/folders/getAll/{guest}"))).await;
    assert_eq!(body["sharedFolders"][0]["folder_id"], folder_id);
    assert_eq!(body["userFolders"].as_array().unwrap().len(), 0);

    let (status, _) = send(&app, json_request("DELETE", "/permissions/delete", grant.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, json_request("DELETE", "/permissions/delete", grant)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn uploaded_description_is_taken() {
    let app = db_app().await;
    let owner = create_user(&app, "photog").await;
    let (folder_id, folder_name) = create_folder(&app, &owner).await;
    let description = unique("sunset");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/bubbles/upload",
            json!({"id": folder_id, "description": description, "picture": "/9j/2w=="}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["image"], "data:image/jpeg;base64,/9j/2w==");

    let (_, body) = send(
        &app,
        json_request("POST", "/bubbles/check-description", json!({"description": description})),
    )
    .await;
    assert_eq!(body["unique"], false);

    let (_, body) = send(&app, get(&format!("/bubbles/getDescriptions/{folder_id}"))).await;
    assert_eq!(body[0]["bubble_description"], description.as_str());

    let (_, body) = send(&app, get(&format!("/bubbles/getId/{folder_name}"))).await;
    assert_eq!(body["folder_id"], folder_id);

    let (status, _) = send(
        &app,
        json_request(
            "DELETE",
            "/bubbles/delete-by-description",
            json!({"description": description}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get(&format!("/bubbles/getBubbles/{folder_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
