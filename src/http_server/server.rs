//! # HTTP Server
//!
//! Main HTTP server combining the auth and file routers over the two
//! long-lived store handles.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::AuthStore;
use crate::store::FileStore;

use super::auth_routes::{auth_routes, AuthState};
use super::config::HttpServerConfig;
use super::file_routes::{file_routes, FilesState};

/// HTTP server for the cubby API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over already-opened store handles.
    pub fn new(config: HttpServerConfig, auth: Arc<AuthStore>, files: Arc<FileStore>) -> Self {
        let router = Self::build_router(&config, auth, files);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(
        config: &HttpServerConfig,
        auth: Arc<AuthStore>,
        files: Arc<FileStore>,
    ) -> Router {
        let auth_state = Arc::new(AuthState { auth: auth.clone() });
        let files_state = Arc::new(FilesState { auth, files });

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(auth_routes(auth_state))
            .nest(
                "/files",
                file_routes(files_state, config.max_upload_bytes),
            )
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address: {}", e),
            )
        })?;

        info!(%addr, "starting cubby HTTP server");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_router_builds_with_default_config() {
        let dir = TempDir::new().unwrap();
        let auth = Arc::new(AuthStore::open(dir.path().join("auth.redb")).unwrap());
        let files = Arc::new(FileStore::open(dir.path().join("files.redb")).unwrap());

        let server = HttpServer::new(HttpServerConfig::default(), auth, files);
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
        let _router = server.router();
    }
}
