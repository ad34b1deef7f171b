//! # HTTP API
//!
//! A thin axum layer over [`ProjectStore`], [`UploadPolicy`] and
//! [`MetadataLoader`]. Mutating endpoints answer `{ ok, error?, path? }`;
//! the server holds no edit sessions, every request runs to completion on
//! its own.

use crate::error::WorkspaceError;
use crate::project::{CreateOptions, ProjectStore};
use crate::schema_loader::{MetadataLoader, CSS_SCHEMA_FILE, TAGS_FILE};
use crate::uploads::{UploadPolicy, DEFAULT_CATEGORY};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};

/// Upper bound on request bodies; uploads may be videos.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: ProjectStore,
    pub uploads: UploadPolicy,
    pub metadata: MetadataLoader,
}

impl AppState {
    pub fn new(store: ProjectStore, metadata: MetadataLoader) -> Self {
        Self {
            store,
            uploads: UploadPolicy::default(),
            metadata,
        }
    }
}

type SharedState = Arc<AppState>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            ok: true,
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::error(message))).into_response()
}

impl WorkspaceError {
    pub fn status(&self) -> StatusCode {
        match self {
            WorkspaceError::InvalidName
            | WorkspaceError::AlreadyExists(_)
            | WorkspaceError::Rejected(_) => StatusCode::BAD_REQUEST,
            WorkspaceError::ProjectNotFound(_) | WorkspaceError::FileNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            WorkspaceError::Forbidden(_) => StatusCode::FORBIDDEN,
            WorkspaceError::Io(_) | WorkspaceError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WorkspaceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        failure(status, self.to_string())
    }
}

/// Build the API router. When `static_dir` is given it is served for every
/// path no route claims.
pub fn router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/:project", delete(delete_project))
        .route("/api/projects/:project/save", post(save_markup))
        .route("/api/projects/:project/save_css", post(save_stylesheet))
        .route("/api/projects/:project/upload", post(upload))
        .route("/api/tags_attributes", get(tags_attributes))
        .route("/api/css_schema", get(css_schema))
        .route("/projects/:project/*file", get(project_file))
        .with_state(Arc::new(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => api,
    };
    app.layer(CorsLayer::permissive())
}

async fn list_projects(State(state): State<SharedState>) -> Result<Json<Vec<String>>, WorkspaceError> {
    Ok(Json(state.store.list()?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CreateProjectRequest {
    name: String,
    css: bool,
    js: bool,
}

async fn create_project(State(state): State<SharedState>, body: Bytes) -> Response {
    let request: CreateProjectRequest = serde_json::from_slice(&body).unwrap_or_default();
    if request.name.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "no project name provided");
    }
    let options = CreateOptions {
        css: request.css,
        js: request.js,
    };
    match state.store.create(&request.name, options) {
        Ok(name) => Json(ApiResponse::with_path(name)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_project(
    State(state): State<SharedState>,
    Path(project): Path<String>,
) -> Result<Json<ApiResponse>, WorkspaceError> {
    state.store.delete(&project)?;
    Ok(Json(ApiResponse::ok()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SaveMarkupRequest {
    html: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SaveStylesheetRequest {
    css: Option<String>,
}

// Bodies are parsed leniently: anything that is not the expected JSON
// object is treated as a missing field.
async fn save_markup(
    State(state): State<SharedState>,
    Path(project): Path<String>,
    body: Bytes,
) -> Response {
    let request: SaveMarkupRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(html) = request.html else {
        return failure(StatusCode::BAD_REQUEST, "no html provided");
    };
    match state.store.write_markup(&project, &html) {
        Ok(()) => {
            info!(project = %project, "Saved markup");
            Json(ApiResponse::ok()).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn save_stylesheet(
    State(state): State<SharedState>,
    Path(project): Path<String>,
    body: Bytes,
) -> Response {
    let request: SaveStylesheetRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(css) = request.css else {
        return failure(StatusCode::BAD_REQUEST, "no css provided");
    };
    match state.store.write_stylesheet(&project, &css) {
        Ok(()) => {
            info!(project = %project, "Saved stylesheet");
            Json(ApiResponse::ok()).into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    target: Option<String>,
    filename: Option<String>,
}

async fn upload(
    State(state): State<SharedState>,
    Path(project): Path<String>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Response {
    let filename = query.filename.unwrap_or_default();
    if filename.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "empty filename");
    }
    if body.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "no file");
    }
    let target = query.target.unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let dir = match state.store.existing_path(&project) {
        Ok(dir) => dir,
        Err(err) => return err.into_response(),
    };
    match state.uploads.save(&dir, &target, &filename, &body) {
        Ok(path) => Json(ApiResponse::with_path(path)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn tags_attributes(State(state): State<SharedState>) -> Response {
    metadata_response(&state.metadata, TAGS_FILE)
}

async fn css_schema(State(state): State<SharedState>) -> Response {
    metadata_response(&state.metadata, CSS_SCHEMA_FILE)
}

fn metadata_response(loader: &MetadataLoader, name: &str) -> Response {
    match loader.load_raw(name) {
        Ok(Some((value, _))) => Json(value).into_response(),
        Ok(None) => failure(StatusCode::NOT_FOUND, "not found"),
        Err(err) => err.into_response(),
    }
}

async fn project_file(
    State(state): State<SharedState>,
    Path((project, file)): Path<(String, String)>,
) -> Response {
    match state.store.read_file(&project, &file) {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&file))], bytes).into_response(),
        Err(err) => err.into_response(),
    }
}

fn content_type(file: &str) -> &'static str {
    let extension = file
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "ogg" => "audio/ogg",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let store = ProjectStore::open(dir.path().join("projects")).unwrap();
        store
            .create("site", CreateOptions { css: true, js: false })
            .unwrap();
        let state = AppState::new(store, MetadataLoader::new(dir.path()));
        (dir, router(state, None))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: impl Into<Body>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn api(bytes: &[u8]) -> ApiResponse {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_and_create_projects() {
        let (_dir, app) = app();
        let (status, body) = send(&app, Method::GET, "/api/projects", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Vec<String>>(&body).unwrap(), vec!["site"]);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/projects",
            r#"{"name": "new site", "js": true}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(api(&body).path.as_deref(), Some("new_site"));

        let (status, body) = send(&app, Method::POST, "/api/projects", r#"{"name": "site"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!api(&body).ok);
    }

    #[tokio::test]
    async fn test_save_requires_field() {
        let (_dir, app) = app();
        let (status, body) = send(&app, Method::POST, "/api/projects/site/save", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(api(&body).error.as_deref(), Some("no html provided"));

        let (status, _) = send(&app, Method::POST, "/api/projects/site/save_css", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/projects/site/save",
            r#"{"html": "<p>x</p>"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(api(&body), ApiResponse::ok());

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/projects/ghost/save",
            r#"{"html": ""}"#,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_and_serve() {
        let (_dir, app) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/projects/site/upload?target=images&filename=logo.png",
            vec![1u8, 2, 3],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(api(&body).path.as_deref(), Some("images/logo.png"));

        let (status, body) = send(&app, Method::GET, "/projects/site/images/logo.png", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, vec![1u8, 2, 3]);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/projects/site/upload?target=images&filename=movie.mp4",
            vec![0u8],
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(api(&body).error.as_deref(), Some("invalid extension"));
    }

    #[tokio::test]
    async fn test_project_file_rejects_traversal() {
        let (_dir, app) = app();
        let (status, _) = send(&app, Method::GET, "/projects/site/..%2F..%2Fsecret", Body::empty()).await;
        assert!(status == StatusCode::FORBIDDEN || status == StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/projects/site/nothing.css", Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::GET, "/projects/site/style.css", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains(".hero"));
    }

    #[tokio::test]
    async fn test_metadata_endpoints() {
        let (dir, app) = app();
        let (status, _) = send(&app, Method::GET, "/api/tags_attributes", Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        std::fs::write(dir.path().join(TAGS_FILE), r#"{"img": ["src"]}"#).unwrap();
        let (status, body) = send(&app, Method::GET, "/api/tags_attributes", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["img"][0], "src");
    }

    #[tokio::test]
    async fn test_delete_project() {
        let (_dir, app) = app();
        let (status, _) = send(&app, Method::DELETE, "/api/projects/site", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::DELETE, "/api/projects/site", Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
