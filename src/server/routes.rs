//! Router configuration for the web server.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::map_page))
        .route("/health", get(handlers::health))
        // Overlay data, fetched independently by the page
        .route("/api/earthquakes", get(handlers::api_earthquakes))
        .route("/api/plates", get(handlers::api_plates))
        .route("/api/legend", get(handlers::api_legend))
        .route("/api/status", get(handlers::api_status))
        // Static assets (CSS/JS)
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/map.js", get(handlers::serve_js))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
