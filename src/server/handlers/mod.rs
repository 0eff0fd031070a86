//! HTTP request handlers for the web server.

mod api;
mod pages;
mod static_files;

// Re-export handlers for use by the router
pub use api::{api_earthquakes, api_legend, api_plates, api_status, health};
pub use pages::map_page;
pub use static_files::{serve_css, serve_js};
