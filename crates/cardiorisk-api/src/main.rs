use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

mod config;
mod handlers;
mod models;

use config::ServerConfig;
use handlers::{health_check, predict};
use models::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .init();

    info!("Starting cardiorisk API");

    let state = Arc::new(AppState {
        model_id: config.model_id.clone(),
    });

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("Serving model `{}`", config.model_id);
    info!("Prediction API listening on http://{}", addr);
    info!("Health check: http://{}/api/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/predict", post(predict))
        .with_state(state)
        // The dashboard is served from a different origin.
        .layer(CorsLayer::permissive())
}
