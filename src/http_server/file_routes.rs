//! File HTTP Routes
//!
//! The authenticated `/files` surface: list, download, upload, delete. Each
//! handler resolves the bearer token to a user id first and passes it to
//! the storage core untouched.
//!
//! The upload size cap lives here as a body limit; the storage core never
//! sees an oversized request.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{AuthError, AuthStore};
use crate::store::{FileStore, FileStoreError};

/// Files state shared across handlers
pub struct FilesState {
    pub auth: Arc<AuthStore>,
    pub files: Arc<FileStore>,
}

/// File routes with shared state.
///
/// `max_upload_bytes` bounds the request body before a handler runs, so an
/// oversized upload is rejected without buffering it fully.
pub fn file_routes(state: Arc<FilesState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(list_files_handler))
        .route("/{name}", get(download_file_handler))
        .route("/{name}", put(upload_file_handler))
        .route("/{name}", delete(delete_file_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

fn auth_error(err: AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            code: err.status_code(),
            error: err.to_string(),
        }),
    )
}

fn store_error(err: FileStoreError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            code: err.status_code(),
            error: err.to_string(),
        }),
    )
}

// ==================
// Helper Functions
// ==================

/// Resolve the `Authorization: Bearer` header to an authenticated user id.
fn authenticate(
    auth: &AuthStore,
    headers: &HeaderMap,
) -> Result<Uuid, (StatusCode, Json<ErrorResponse>)> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| auth_error(AuthError::InvalidToken))?;

    auth.validate_token(token).map_err(auth_error)
}

// ==================
// Handlers
// ==================

async fn list_files_handler(
    State(state): State<Arc<FilesState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<String>>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = authenticate(&state.auth, &headers)?;

    let names = state.files.list(user_id).map_err(store_error)?;
    Ok(Json(names))
}

async fn download_file_handler(
    State(state): State<Arc<FilesState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let user_id = authenticate(&state.auth, &headers)?;

    let (bytes, content_type) = state.files.get(user_id, &name).map_err(store_error)?;

    // Content-Type is returned exactly as it was stored
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

async fn upload_file_handler(
    State(state): State<Arc<FilesState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let user_id = authenticate(&state.auth, &headers)?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream");

    state
        .files
        .put(user_id, &name, content_type, &body)
        .map_err(store_error)?;

    Ok(StatusCode::CREATED)
}

async fn delete_file_handler(
    State(state): State<Arc<FilesState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let user_id = authenticate(&state.auth, &headers)?;

    state.files.delete(user_id, &name).map_err(store_error)?;

    Ok(StatusCode::NO_CONTENT)
}
