//! Auth HTTP Routes
//!
//! `POST /register` and `POST /login` over the [`AuthStore`].

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::Serialize;

use crate::auth::{AuthError, AuthStore, CredentialsRequest};

/// Shared auth state
pub struct AuthState {
    pub auth: Arc<AuthStore>,
}

/// Auth routes with shared state
pub fn auth_routes(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        Self {
            code: err.status_code(),
            error: err.to_string(),
        }
    }
}

fn auth_error(err: AuthError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err)))
}

// ==================
// Handlers
// ==================

async fn register_handler(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .auth
        .register(&request.username, &request.password)
        .map_err(auth_error)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn login_handler(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    let token = state
        .auth
        .login(&request.username, &request.password)
        .map_err(auth_error)?;

    Ok(Json(LoginResponse { token }))
}
