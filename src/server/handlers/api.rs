//! API endpoint handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::super::AppState;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Upstream feed failure, reported as `{"error": ...}`.
fn bad_gateway(error: String) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        axum::Json(serde_json::json!({ "error": error })),
    )
        .into_response()
}

/// Styled earthquake markers as a GeoJSON FeatureCollection.
pub async fn api_earthquakes(State(state): State<AppState>) -> Response {
    match state.earthquakes().await {
        Ok(layer) => axum::Json(layer.to_feature_collection()).into_response(),
        Err(e) => bad_gateway(e),
    }
}

/// Plate boundaries with the line style to draw them in.
pub async fn api_plates(State(state): State<AppState>) -> Response {
    match state.plates().await {
        Ok(layer) => axum::Json(layer.as_ref()).into_response(),
        Err(e) => bad_gateway(e),
    }
}

/// Legend entries in bucket order.
pub async fn api_legend(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.legend.as_slice()).into_response()
}

/// Load status of each feed.
///
/// Loads any layer that is not cached, so the response always reflects a
/// recent attempt for both feeds.
pub async fn api_status(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.refresh_statuses().await)
}
