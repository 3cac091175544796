//! Configuration module for the gallery.

use serde::Deserialize;
use std::path::Path;

use crate::{GalleryError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins (empty allows any origin without credentials).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/gallery.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory holding uploaded photo files.
    #[serde(default = "default_upload_dir")]
    pub directory: String,
    /// File extensions accepted on upload (case-insensitive, without dot).
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_upload_dir() -> String {
    "static/uploads".to_string()
}

fn default_allowed_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_upload_size() -> u64 {
    16
}

impl UploadsConfig {
    /// Maximum upload size in bytes, saturating at `u64::MAX`.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            directory: default_upload_dir(),
            allowed_extensions: default_allowed_extensions(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/gallery.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload storage configuration.
    #[serde(default)]
    pub uploads: UploadsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(GalleryError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| GalleryError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `GALLERY_UPLOAD_DIR`: Override the upload directory
    /// - `GALLERY_DATABASE_PATH`: Override the database file path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("GALLERY_UPLOAD_DIR") {
            if !dir.is_empty() {
                self.uploads.directory = dir;
            }
        }
        if let Ok(path) = std::env::var("GALLERY_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.uploads.directory.trim().is_empty() {
            return Err(GalleryError::Config(
                "uploads.directory must not be empty".to_string(),
            ));
        }
        if self
            .uploads
            .allowed_extensions
            .iter()
            .all(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(GalleryError::Config(
                "uploads.allowed_extensions must list at least one extension".to_string(),
            ));
        }
        if self.uploads.max_upload_size_mb == 0 {
            return Err(GalleryError::Config(
                "uploads.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
