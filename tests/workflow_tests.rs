//! End-to-end workflow tests against an in-process mock of the
//! detection service.
//!
//! Each test spins up an axum router on an ephemeral port and drives the
//! real controller (reqwest transport included) against it.

use std::path::PathBuf;

use axum::extract::{Multipart, Path};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::json;

use dfcheck::config::Config;
use dfcheck::services::session::AuthMode;
use dfcheck::WorkflowController;

const TEST_TOKEN: &str = "abc";

// ============================================================================
// Mock service
// ============================================================================

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterBody {
    email: String,
    #[allow(dead_code)]
    password: String,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {}", TEST_TOKEN))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
        .into_response()
}

async fn login_ok(Form(form): Form<LoginForm>) -> Response {
    assert!(!form.username.is_empty());
    if form.password == "wrong" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Incorrect email or password"})),
        )
            .into_response();
    }
    Json(json!({"access_token": TEST_TOKEN, "token_type": "bearer"})).into_response()
}

async fn register_ok(Json(body): Json<RegisterBody>) -> Response {
    Json(json!({"id": 1, "email": body.email})).into_response()
}

async fn upload_ok(headers: HeaderMap, mut multipart: Multipart) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    match multipart.next_field().await {
        Ok(Some(field)) if field.name() == Some("file") => {
            assert_eq!(field.file_name(), Some("face.jpg"));
            let _ = field.bytes().await.unwrap();
            Json(json!({"id": 7, "filename": "stored.jpg"})).into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "missing file field"})),
        )
            .into_response(),
    }
}

async fn upload_rejects(headers: HeaderMap, _multipart: Multipart) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::BAD_REQUEST, Json(json!({"detail": "bad file"}))).into_response()
}

async fn detect_ok(Path(id): Path<i64>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    assert_eq!(id, 7);
    Json(json!({"id": 1, "media_id": id, "is_deepfake": 1, "confidence": 0.873})).into_response()
}

async fn detect_crashes(Path(_id): Path<i64>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"detail": "Model crashed"})),
    )
        .into_response()
}

async fn result_ok(Path(id): Path<i64>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    assert_eq!(id, 7);
    Json(json!({"id": 1, "media_id": id, "is_deepfake": 1, "confidence": 0.873})).into_response()
}

async fn result_missing(Path(_id): Path<i64>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    // No JSON body at all; the client must fall back to the stage default
    StatusCode::NOT_FOUND.into_response()
}

fn happy_router() -> Router {
    Router::new()
        .route("/login", post(login_ok))
        .route("/register", post(register_ok))
        .route("/upload/", post(upload_ok))
        .route("/detect/:id", post(detect_ok))
        .route("/result/:id", get(result_ok))
}

async fn spawn_app(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

// ============================================================================
// Fixtures
// ============================================================================

fn media_fixture(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"\xff\xd8\xff fake jpeg bytes").unwrap();
    path
}

async fn logged_in_controller(base_url: &str) -> WorkflowController {
    let config = Config::with_api_url(base_url);
    let mut controller = WorkflowController::new(&config).unwrap();
    controller.login("user@example.com", "secret").await;
    assert!(controller.is_authenticated(), "login should succeed");
    assert!(controller.auth_error().is_none());
    controller
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn full_pipeline_records_result_and_history() {
    let base = spawn_app(happy_router()).await;
    let dir = tempfile::tempdir().unwrap();
    let file = media_fixture(&dir, "face.jpg");

    let mut controller = logged_in_controller(&base).await;
    controller.select_file(&file);
    assert!(controller.selection().is_some());
    assert!(controller.detection_error().is_none());

    controller.submit().await;

    let result = controller.result().expect("detection result");
    assert!(result.is_deepfake);
    // Exact pass-through, no rounding at this layer
    assert_eq!(result.confidence, 0.873);

    assert_eq!(controller.history().len(), 1);
    let entry = controller.history().entries().next().unwrap();
    assert_eq!(entry.filename, "face.jpg");
    assert!(entry.is_deepfake);
    assert_eq!(entry.confidence, 0.873);

    assert!(!controller.is_loading());
    assert!(controller.detection_error().is_none());
}

#[tokio::test]
async fn upload_failure_surfaces_detail_verbatim() {
    let router = Router::new()
        .route("/login", post(login_ok))
        .route("/upload/", post(upload_rejects));
    let base = spawn_app(router).await;
    let dir = tempfile::tempdir().unwrap();
    let file = media_fixture(&dir, "face.jpg");

    let mut controller = logged_in_controller(&base).await;
    controller.select_file(&file);
    controller.submit().await;

    assert_eq!(controller.detection_error(), Some("bad file"));
    assert!(controller.result().is_none());
    assert!(controller.history().is_empty());
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn trigger_failure_leaves_history_unchanged() {
    let router = Router::new()
        .route("/login", post(login_ok))
        .route("/upload/", post(upload_ok))
        .route("/detect/:id", post(detect_crashes));
    let base = spawn_app(router).await;
    let dir = tempfile::tempdir().unwrap();
    let file = media_fixture(&dir, "face.jpg");

    let mut controller = logged_in_controller(&base).await;
    controller.select_file(&file);
    controller.submit().await;

    assert_eq!(controller.detection_error(), Some("Model crashed"));
    assert!(controller.result().is_none());
    assert!(controller.history().is_empty());
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn result_failure_falls_back_to_stage_default() {
    let router = Router::new()
        .route("/login", post(login_ok))
        .route("/upload/", post(upload_ok))
        .route("/detect/:id", post(detect_ok))
        .route("/result/:id", get(result_missing));
    let base = spawn_app(router).await;
    let dir = tempfile::tempdir().unwrap();
    let file = media_fixture(&dir, "face.jpg");

    let mut controller = logged_in_controller(&base).await;
    controller.select_file(&file);
    controller.submit().await;

    assert_eq!(controller.detection_error(), Some("Could not get result"));
    assert!(controller.history().is_empty());
}

#[tokio::test]
async fn unreachable_service_normalizes_to_generic_message() {
    // Bind then immediately drop to obtain a port nobody is listening on
    let dead_addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let config = Config::with_api_url(format!("http://{}", dead_addr));
    let mut controller = WorkflowController::new(&config).unwrap();
    controller.login("user@example.com", "secret").await;

    assert_eq!(controller.auth_error(), Some("Something went wrong"));
    assert!(!controller.is_authenticated());
}

#[tokio::test]
async fn login_failure_surfaces_detail() {
    let base = spawn_app(happy_router()).await;
    let config = Config::with_api_url(base.as_str());
    let mut controller = WorkflowController::new(&config).unwrap();

    controller.login("user@example.com", "wrong").await;

    assert_eq!(
        controller.auth_error(),
        Some("Incorrect email or password")
    );
    assert!(!controller.is_authenticated());
}

#[tokio::test]
async fn registration_flips_mode_without_authenticating() {
    let base = spawn_app(happy_router()).await;
    let config = Config::with_api_url(base.as_str());
    let mut controller = WorkflowController::new(&config).unwrap();

    controller.set_auth_mode(AuthMode::Register);
    controller.register("new@example.com", "secret").await;

    assert_eq!(
        controller.info_message(),
        Some("Registration successful! Please log in.")
    );
    assert_eq!(controller.auth_mode(), AuthMode::Login);
    assert!(!controller.is_authenticated());
    assert!(controller.auth_error().is_none());
}

#[tokio::test]
async fn logout_clears_all_session_state() {
    let base = spawn_app(happy_router()).await;
    let dir = tempfile::tempdir().unwrap();
    let file = media_fixture(&dir, "face.jpg");

    let mut controller = logged_in_controller(&base).await;
    controller.select_file(&file);
    controller.submit().await;
    assert_eq!(controller.history().len(), 1);
    let preview_path = controller
        .selection()
        .unwrap()
        .preview
        .path()
        .to_path_buf();
    assert!(preview_path.exists());

    controller.logout();

    assert!(!controller.is_authenticated());
    assert!(controller.history().is_empty());
    assert!(controller.result().is_none());
    assert!(controller.selection().is_none());
    assert!(controller.auth_error().is_none());
    assert!(controller.detection_error().is_none());
    // The preview copy is released along with the selection
    assert!(!preview_path.exists());
}

#[tokio::test]
async fn submit_requires_login_and_selection() {
    let base = spawn_app(happy_router()).await;
    let config = Config::with_api_url(base.as_str());
    let mut controller = WorkflowController::new(&config).unwrap();

    // Not logged in: refused locally, no network involved
    controller.submit().await;
    assert_eq!(controller.detection_error(), Some("Please log in first."));

    controller.login("user@example.com", "secret").await;
    controller.submit().await;
    assert_eq!(
        controller.detection_error(),
        Some("Please select an image or video file.")
    );
    assert!(controller.history().is_empty());
}

#[tokio::test]
async fn rejected_extension_never_reaches_the_network() {
    // No server at all: validation failure must stay local
    let config = Config::with_api_url("http://127.0.0.1:1");
    let mut controller = WorkflowController::new(&config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("malware.exe");
    std::fs::write(&path, b"MZ").unwrap();

    controller.select_file(&path);

    assert!(controller.selection().is_none());
    assert_eq!(
        controller.detection_error(),
        Some("Please select a JPG, PNG image or MP4, AVI, MOV video.")
    );
}

#[tokio::test]
async fn replacing_selection_releases_previous_preview() {
    let config = Config::with_api_url("http://127.0.0.1:1");
    let mut controller = WorkflowController::new(&config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let first = media_fixture(&dir, "first.png");
    let second = media_fixture(&dir, "second.mp4");

    controller.select_file(&first);
    let first_preview = controller
        .selection()
        .unwrap()
        .preview
        .path()
        .to_path_buf();
    assert!(first_preview.exists());

    controller.select_file(&second);
    assert!(!first_preview.exists(), "old preview copy must be deleted");
    let selection = controller.selection().unwrap();
    assert_eq!(selection.filename, "second.mp4");
    assert!(selection.preview.path().exists());

    controller.clear_selection();
    assert!(controller.selection().is_none());
}

#[tokio::test]
async fn new_submission_clears_stale_result_before_failing() {
    // First submission succeeds, second fails: the stale verdict must not
    // linger alongside the new error.
    let base_ok = spawn_app(happy_router()).await;
    let dir = tempfile::tempdir().unwrap();
    let file = media_fixture(&dir, "face.jpg");

    let mut controller = logged_in_controller(&base_ok).await;
    controller.select_file(&file);
    controller.submit().await;
    assert!(controller.result().is_some());

    // Swap the selection for a file that has since disappeared so the
    // pipeline fails before any stage completes
    std::fs::remove_file(&file).unwrap();
    controller.submit().await;

    assert!(controller.result().is_none());
    assert_eq!(controller.detection_error(), Some("Something went wrong"));
    // The earlier success is still in history; failures never mutate it
    assert_eq!(controller.history().len(), 1);
    assert!(!controller.is_loading());
}
