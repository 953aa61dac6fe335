use super::*;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Serializes tests that touch the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Callers must hold [`env_lock`].
unsafe fn clear_server_env() {
    unsafe {
        for key in [
            "DATABASE_URL",
            "PORT",
            "DB_MAX_CONNECTIONS",
            "PUBLIC_DIR",
            "UPLOAD_DIR",
            "UPLOAD_MAX_BYTES",
            "CORS_ORIGIN",
            "FFMPEG_BIN",
            "STORAGE_BACKEND",
            "STORAGE_DIR",
            "PUBLIC_BASE_URL",
            "GCS_BUCKET",
            "GCS_ACCESS_TOKEN",
        ] {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn from_env_applies_defaults() {
    let _env = env_lock();
    unsafe {
        clear_server_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/veda");
    }

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(cfg.database_url, "postgres://localhost/veda");
    assert_eq!(cfg.public_dir, PathBuf::from(DEFAULT_PUBLIC_DIR));
    assert_eq!(cfg.upload_dir, PathBuf::from(DEFAULT_UPLOAD_DIR));
    assert_eq!(cfg.upload_max_bytes, DEFAULT_UPLOAD_MAX_BYTES);
    assert_eq!(cfg.cors_origin, None);
    assert_eq!(cfg.ffmpeg_bin, DEFAULT_FFMPEG_BIN);
    assert_eq!(
        cfg.storage,
        StorageConfig::Local {
            dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            public_base_url: "http://localhost:3000".into(),
        }
    );

    unsafe { clear_server_env() };
}

#[test]
fn from_env_requires_database_url() {
    let _env = env_lock();
    unsafe { clear_server_env() };
    assert_eq!(ServerConfig::from_env().unwrap_err(), ConfigError::Missing("DATABASE_URL"));
}

#[test]
fn from_env_rejects_invalid_port() {
    let _env = env_lock();
    unsafe {
        clear_server_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/veda");
        std::env::set_var("PORT", "eighty");
    }

    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: "PORT", value: "eighty".into() });

    unsafe { clear_server_env() };
}

#[test]
fn from_env_parses_gcs_backend() {
    let _env = env_lock();
    unsafe {
        clear_server_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/veda");
        std::env::set_var("STORAGE_BACKEND", "gcs");
        std::env::set_var("GCS_BUCKET", "veda-lectures");
        std::env::set_var("GCS_ACCESS_TOKEN", "ya29.token");
        std::env::set_var("CORS_ORIGIN", "http://localhost:5173");
    }

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(
        cfg.storage,
        StorageConfig::Gcs { bucket: "veda-lectures".into(), access_token: "ya29.token".into() }
    );
    assert_eq!(cfg.cors_origin.as_deref(), Some("http://localhost:5173"));

    unsafe { clear_server_env() };
}

#[test]
fn from_env_gcs_without_bucket_errors() {
    let _env = env_lock();
    unsafe {
        clear_server_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/veda");
        std::env::set_var("STORAGE_BACKEND", "gcs");
    }

    assert_eq!(ServerConfig::from_env().unwrap_err(), ConfigError::Missing("GCS_BUCKET"));

    unsafe { clear_server_env() };
}

#[test]
fn from_env_unknown_backend_errors() {
    let _env = env_lock();
    unsafe {
        clear_server_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/veda");
        std::env::set_var("STORAGE_BACKEND", "s3");
    }

    let err = ServerConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("STORAGE_BACKEND"));

    unsafe { clear_server_env() };
}

#[test]
fn from_env_trims_public_base_url() {
    let _env = env_lock();
    unsafe {
        clear_server_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/veda");
        std::env::set_var("PUBLIC_BASE_URL", "https://veda.example/");
        std::env::set_var("PORT", "8080");
    }

    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8080);
    let StorageConfig::Local { public_base_url, .. } = cfg.storage else {
        panic!("expected local storage");
    };
    assert_eq!(public_base_url, "https://veda.example");

    unsafe { clear_server_env() };
}

#[test]
fn from_env_reads_pool_size_and_rejects_zero() {
    let _env = env_lock();
    unsafe {
        clear_server_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/veda");
        std::env::set_var("DB_MAX_CONNECTIONS", "12");
    }
    assert_eq!(ServerConfig::from_env().unwrap().db_max_connections, 12);

    unsafe { std::env::set_var("DB_MAX_CONNECTIONS", "0") };
    assert_eq!(
        ServerConfig::from_env().unwrap_err(),
        ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", value: "0".into() }
    );

    unsafe { std::env::set_var("DB_MAX_CONNECTIONS", "many") };
    assert!(matches!(ServerConfig::from_env(), Err(ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", .. })));

    unsafe { clear_server_env() };
}
