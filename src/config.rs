//! Server configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 512 * 1024 * 1024;
pub const DEFAULT_FFMPEG_BIN: &str = "ffmpeg";
pub const DEFAULT_STORAGE_DIR: &str = "media";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Where compressed lecture videos are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Files under `dir`, served by this process at `/media`.
    Local { dir: PathBuf, public_base_url: String },
    /// A Google Cloud Storage bucket written through the JSON upload API.
    Gcs { bucket: String, access_token: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    /// Pool size; never zero.
    pub db_max_connections: u32,
    pub public_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
    /// Allowed CORS origin; `None` allows any origin.
    pub cors_origin: Option<String>,
    pub ffmpeg_bin: String,
    pub storage: StorageConfig,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: pool size, default 5, must be positive
    /// - `PUBLIC_DIR`: static site root, default `public`
    /// - `UPLOAD_DIR`: scratch space for uploads, default `uploads`
    /// - `UPLOAD_MAX_BYTES`: default 512 MiB
    /// - `CORS_ORIGIN`: single allowed origin, default any
    /// - `FFMPEG_BIN`: default `ffmpeg`
    /// - `STORAGE_BACKEND`: `local` (default) or `gcs`
    /// - `STORAGE_DIR`, `PUBLIC_BASE_URL`: local backend
    /// - `GCS_BUCKET`, `GCS_ACCESS_TOKEN`: gcs backend (both required)
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let port = env_parse_strict("PORT", DEFAULT_PORT)?;
        let db_max_connections = env_parse_strict("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", value: "0".to_owned() });
        }

        Ok(Self {
            port,
            database_url,
            db_max_connections,
            public_dir: env_path("PUBLIC_DIR", DEFAULT_PUBLIC_DIR),
            upload_dir: env_path("UPLOAD_DIR", DEFAULT_UPLOAD_DIR),
            upload_max_bytes: env_parse_strict("UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?,
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|v| !v.trim().is_empty()),
            ffmpeg_bin: std::env::var("FFMPEG_BIN").unwrap_or_else(|_| DEFAULT_FFMPEG_BIN.to_owned()),
            storage: storage_from_env(port)?,
        })
    }
}

fn storage_from_env(port: u16) -> Result<StorageConfig, ConfigError> {
    match std::env::var("STORAGE_BACKEND").ok().as_deref().unwrap_or("local") {
        "local" => Ok(StorageConfig::Local {
            dir: env_path("STORAGE_DIR", DEFAULT_STORAGE_DIR),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}"))
                .trim_end_matches('/')
                .to_owned(),
        }),
        "gcs" => Ok(StorageConfig::Gcs {
            bucket: std::env::var("GCS_BUCKET").map_err(|_| ConfigError::Missing("GCS_BUCKET"))?,
            access_token: std::env::var("GCS_ACCESS_TOKEN").map_err(|_| ConfigError::Missing("GCS_ACCESS_TOKEN"))?,
        }),
        other => Err(ConfigError::Invalid { key: "STORAGE_BACKEND", value: other.to_owned() }),
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key).map_or_else(|_| PathBuf::from(default), PathBuf::from)
}

/// Parse `key` when set; a present-but-invalid value is an error rather than
/// a silent fallback.
fn env_parse_strict<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
