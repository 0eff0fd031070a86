//! Map page handler.

use askama::Template;
use axum::{extract::State, response::Html};

use super::super::template_structs::MapTemplate;
use super::super::AppState;
use crate::utils::script_json;

/// The map page. Overlay data is fetched by the page script from the API.
pub async fn map_page(State(state): State<AppState>) -> Html<String> {
    let config_json = match script_json(state.map_config.as_ref()) {
        Ok(json) => json,
        Err(e) => return Html(format!("Template error: {}", e)),
    };

    let template = MapTemplate {
        title: "Earthquakes",
        legend: state.legend.as_slice(),
        config_json,
        data_json: None,
        // The page script reports overlay failures as it loads them
        failures: Vec::new(),
        generated_at: None,
        inline_css: None,
        inline_js: None,
    };

    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}
