//! CLI command implementations
//!
//! `init` creates the data directory and both databases with their tables;
//! `start` opens the two long-lived store handles once and serves HTTP
//! until shutdown. Stores are never re-opened per request.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthStore;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::store::FileStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

const AUTH_DB_FILE: &str = "auth.redb";
const FILES_DB_FILE: &str = "files.redb";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Host to bind to (optional, default "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (optional, default 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (optional, default empty = permissive)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum upload size in bytes (optional, default 1 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    1024 * 1024
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.data_dir.is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.max_upload_bytes == 0 {
            return Err(CliError::config_error("max_upload_bytes must be > 0"));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Build the HTTP server configuration
    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// Parse arguments and dispatch to the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Command::Init { config } => run_init(&config),
        Command::Start { config } => run_start(&config),
    }
}

/// Create the data directory and both databases with their tables.
fn run_init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_path = config.data_path();

    if data_path.join(FILES_DB_FILE).exists() {
        return Err(CliError::already_initialized());
    }

    fs::create_dir_all(data_path)?;

    // Opening the stores creates the database files and their tables
    AuthStore::open(data_path.join(AUTH_DB_FILE))
        .map_err(|e| CliError::boot_failed(e.to_string()))?;
    FileStore::open(data_path.join(FILES_DB_FILE))
        .map_err(|e| CliError::boot_failed(e.to_string()))?;

    println!("Initialized cubby data directory at {}", config.data_dir);

    Ok(())
}

/// Open the long-lived store handles and serve HTTP.
fn run_start(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_path = config.data_path();

    if !data_path.join(FILES_DB_FILE).exists() {
        return Err(CliError::not_initialized());
    }

    init_tracing();

    let auth = Arc::new(
        AuthStore::open(data_path.join(AUTH_DB_FILE))
            .map_err(|e| CliError::boot_failed(e.to_string()))?,
    );
    let files = Arc::new(
        FileStore::open(data_path.join(FILES_DB_FILE))
            .map_err(|e| CliError::boot_failed(e.to_string()))?,
    );

    info!(data_dir = %config.data_dir, "stores opened");

    let server = HttpServer::new(config.http_config(), auth, files);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to start runtime: {}", e)))?;

    runtime
        .block_on(server.start())
        .map_err(|e| CliError::boot_failed(e.to_string()))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
