//! # HTTP Server Module
//!
//! The HTTP surface of cubby: registration, login, and the authenticated
//! `/files` routes. Everything here is thin glue over [`crate::auth`] and
//! [`crate::store`] — it resolves the bearer token, shapes JSON, enforces
//! the upload size cap, and maps typed errors to status codes.

pub mod auth_routes;
pub mod config;
pub mod file_routes;
pub mod server;

pub use auth_routes::{auth_routes, AuthState};
pub use config::HttpServerConfig;
pub use file_routes::{file_routes, FilesState};
pub use server::HttpServer;
