//! `stoplight serve` -- HTTP JSON API for stored traffic lights.
//!
//! Endpoints:
//! - GET  /health                          - Server status
//! - POST /traffic-lights                  - Create or replace a light
//! - GET  /traffic-lights/{id}             - Fetch a light
//! - GET  /traffic-lights/{id}/color       - Current color of a light
//! - POST /traffic-lights/{id}/advance     - Advance a light by N ticks
//!
//! All responses use Content-Type: application/json.

mod handlers;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use stoplight_service::Settings;
use tower_http::cors::{Any, CorsLayer};

use self::handlers::{
    handle_advance, handle_color, handle_get_light, handle_health, handle_not_found,
    handle_upsert_light,
};
use self::state::AppState;

/// Maximum request body size: 64 KB.
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// Build the router over `state`.
fn router(state: Arc<AppState>) -> Router {
    // CORS: permissive, the API carries no credentials
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/traffic-lights", post(handle_upsert_light))
        .route("/traffic-lights/{id}", get(handle_get_light))
        .route("/traffic-lights/{id}/color", get(handle_color))
        .route("/traffic-lights/{id}/advance", post(handle_advance))
        .fallback(handle_not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the HTTP server on `settings.host:settings.port`.
///
/// The storage backend is chosen by `settings.db_type` and lives for the
/// whole server run.
pub async fn start_server(settings: Settings, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let uow = stoplight_service::unit_of_work_for(&settings.db_type)?;
    let state = Arc::new(AppState { uow });

    let app = router(state);

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, backend = %settings.db_type, "server started");
    if !quiet {
        eprintln!("Stoplight server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !quiet {
        eprintln!("\nServer shut down.");
    }
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
