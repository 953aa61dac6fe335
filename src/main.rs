mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    let storage = services::storage::init_store(&config.storage).expect("storage init failed");
    let compressor = Arc::new(services::compression::FfmpegCompressor::new(config.ffmpeg_bin.clone()));
    let state = state::AppState::new(pool, storage.clone(), compressor, config.upload_dir.clone());
    tracing::info!(intents = state.faq.intents().len(), "faq table loaded");

    let app = routes::app(state, &config);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "veda listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");

    storage.shutdown().await;
    tracing::info!("veda stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
