//! Web server for the earthquake map.
//!
//! Serves the map page plus JSON endpoints for each overlay:
//! - `/api/earthquakes` styled earthquake markers
//! - `/api/plates` plate boundaries with their line style
//! - `/api/legend` and `/api/status`

pub mod assets;
mod cache;
mod handlers;
mod routes;
pub mod template_structs;

pub use cache::LayerCache;
pub use routes::create_router;

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::config::Settings;
use crate::feeds::{FeedKind, FeedSource, HttpFeedSource};
use crate::map::{MapConfig, MapView};
use crate::render::{EarthquakeLayer, FeedStatus, PlateLayer, RenderContext};
use crate::style::{build_legend, LegendEntry, DEPTH_BUCKETS};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn FeedSource>,
    pub cache: Arc<LayerCache>,
    pub map_config: Arc<MapConfig>,
    /// Built once at startup.
    pub legend: Arc<Vec<LegendEntry>>,
    /// Held while a layer is fetched so concurrent cache misses share one fetch.
    earthquakes_fetch: Arc<Mutex<()>>,
    plates_fetch: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let source = HttpFeedSource::from_settings(settings)?;
        Ok(Self::with_source(
            Arc::new(source),
            settings.map_view,
            settings.cache_ttl(),
        ))
    }

    pub fn with_source(source: Arc<dyn FeedSource>, view: MapView, cache_ttl: Duration) -> Self {
        Self {
            source,
            cache: Arc::new(LayerCache::with_ttl(cache_ttl)),
            map_config: Arc::new(MapConfig::new(view)),
            legend: Arc::new(build_legend(&DEPTH_BUCKETS)),
            earthquakes_fetch: Arc::new(Mutex::new(())),
            plates_fetch: Arc::new(Mutex::new(())),
        }
    }

    /// Earthquake layer from cache, fetching it if needed.
    /// On failure returns the message shown to the user.
    pub async fn earthquakes(&self) -> Result<Arc<EarthquakeLayer>, String> {
        if let Some(layer) = self.cache.get_earthquakes() {
            return Ok(layer);
        }

        let _fetching = self.earthquakes_fetch.lock().await;
        // Another request may have filled the cache while we waited
        if let Some(layer) = self.cache.get_earthquakes() {
            return Ok(layer);
        }

        let mut ctx = RenderContext::new();
        ctx.on_earthquakes(self.source.fetch(FeedKind::Earthquakes).await);
        self.record_status(&ctx, FeedKind::Earthquakes);

        match ctx.earthquakes {
            Some(layer) => {
                let layer = Arc::new(layer);
                self.cache.set_earthquakes(layer.clone());
                Ok(layer)
            }
            None => Err(failure_message(&ctx, FeedKind::Earthquakes)),
        }
    }

    /// Plate layer from cache, fetching it if needed.
    pub async fn plates(&self) -> Result<Arc<PlateLayer>, String> {
        if let Some(layer) = self.cache.get_plates() {
            return Ok(layer);
        }

        let _fetching = self.plates_fetch.lock().await;
        if let Some(layer) = self.cache.get_plates() {
            return Ok(layer);
        }

        let mut ctx = RenderContext::new();
        ctx.on_plates(self.source.fetch(FeedKind::TectonicPlates).await);
        self.record_status(&ctx, FeedKind::TectonicPlates);

        match ctx.plates {
            Some(layer) => {
                let layer = Arc::new(layer);
                self.cache.set_plates(layer.clone());
                Ok(layer)
            }
            None => Err(failure_message(&ctx, FeedKind::TectonicPlates)),
        }
    }

    /// Load any layer missing from the cache, then return the status of each feed.
    pub async fn refresh_statuses(&self) -> BTreeMap<FeedKind, FeedStatus> {
        let (earthquakes, plates) = tokio::join!(self.earthquakes(), self.plates());
        if let Err(e) = earthquakes {
            tracing::debug!(feed = %FeedKind::Earthquakes, "Status refresh failed: {}", e);
        }
        if let Err(e) = plates {
            tracing::debug!(feed = %FeedKind::TectonicPlates, "Status refresh failed: {}", e);
        }
        self.cache.statuses()
    }

    fn record_status(&self, ctx: &RenderContext, kind: FeedKind) {
        if let Some(status) = ctx.statuses.get(&kind) {
            self.cache.set_status(kind, status.clone());
        }
    }
}

fn failure_message(ctx: &RenderContext, kind: FeedKind) -> String {
    ctx.failures()
        .into_iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, error)| error.to_string())
        .unwrap_or_else(|| format!("{} feed unavailable", kind))
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::feeds::FeedError;

    /// Serves canned feeds and counts fetches.
    struct CannedSource {
        /// Plate fetches that fail before one succeeds.
        plate_failures: AtomicUsize,
        delay: Duration,
        fetches: AtomicUsize,
    }

    impl CannedSource {
        fn new(plates_ok: bool) -> Self {
            Self::failing_plates(if plates_ok { 0 } else { usize::MAX })
        }

        fn failing_plates(times: usize) -> Self {
            Self {
                plate_failures: AtomicUsize::new(times),
                delay: Duration::ZERO,
                fetches: AtomicUsize::new(0),
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new(true)
            }
        }

        fn plates_fail_now(&self) -> bool {
            self.plate_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        }
    }

    #[async_trait]
    impl FeedSource for CannedSource {
        async fn fetch(&self, kind: FeedKind) -> Result<serde_json::Value, FeedError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match kind {
                FeedKind::Earthquakes => Ok(json!({
                    "type": "FeatureCollection",
                    "features": [
                        {
                            "type": "Feature",
                            "properties": { "mag": 4.5, "place": "Near Tonga", "time": 1_700_000_000_000_i64 },
                            "geometry": { "type": "Point", "coordinates": [-175.2, -21.1, 3.0] }
                        },
                        {
                            "type": "Feature",
                            "properties": { "mag": -0.3, "place": "Tiny", "time": 1_700_000_000_000_i64 },
                            "geometry": { "type": "Point", "coordinates": [-117.0, 35.0, 2.0] }
                        }
                    ]
                })),
                FeedKind::TectonicPlates if !self.plates_fail_now() => Ok(json!({
                    "type": "FeatureCollection",
                    "features": [{
                        "type": "Feature",
                        "properties": { "Name": "PA-NA" },
                        "geometry": { "type": "LineString", "coordinates": [[-120.0, 35.0], [-121.0, 36.0]] }
                    }]
                })),
                FeedKind::TectonicPlates => Err(FeedError::Status {
                    url: "https://example.com/plates.json".to_string(),
                    status: 500,
                }),
            }
        }
    }

    fn setup_test_app(source: Arc<CannedSource>) -> axum::Router {
        let state =
            AppState::with_source(source, MapView::default(), Duration::from_secs(60));
        create_router(state)
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app = setup_test_app(Arc::new(CannedSource::new(true)));
        let (status, _) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_earthquakes_styled() {
        let app = setup_test_app(Arc::new(CannedSource::new(true)));
        let (status, json) = get_json(app, "/api/earthquakes").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["type"], "FeatureCollection");
        let features = json["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["style"]["radius"], 90_000.0);
        assert_eq!(features[0]["properties"]["style"]["fillColor"], "#35BC00");
        assert!(features[0]["properties"]["popup"]
            .as_str()
            .unwrap()
            .contains("Near Tonga"));
    }

    #[tokio::test]
    async fn test_api_earthquakes_cached() {
        let source = Arc::new(CannedSource::new(true));
        let app = setup_test_app(source.clone());

        let (first, _) = get(app.clone(), "/api/earthquakes").await;
        let (second, _) = get(app, "/api/earthquakes").await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_api_plates() {
        let app = setup_test_app(Arc::new(CannedSource::new(true)));
        let (status, json) = get_json(app, "/api/plates").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["style"]["color"], "orange");
        assert_eq!(json["boundaries"]["features"][0]["properties"]["Name"], "PA-NA");
    }

    #[tokio::test]
    async fn test_api_plates_failure_is_bad_gateway() {
        let source = Arc::new(CannedSource::new(false));
        let app = setup_test_app(source.clone());

        let (status, json) = get_json(app.clone(), "/api/plates").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json["error"].as_str().unwrap().contains("500"));

        // Failures are not cached
        let _ = get(app, "/api/plates").await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_api_status_reports_each_feed() {
        let app = setup_test_app(Arc::new(CannedSource::new(false)));
        let (status, json) = get_json(app, "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["earthquakes"]["state"], "loaded");
        assert_eq!(json["earthquakes"]["features"], 1);
        assert_eq!(json["earthquakes"]["skipped"], 1);
        assert_eq!(json["tectonic_plates"]["state"], "failed");
    }

    #[tokio::test]
    async fn test_api_legend() {
        let app = setup_test_app(Arc::new(CannedSource::new(true)));
        let (status, json) = get_json(app, "/api/legend").await;

        assert_eq!(status, StatusCode::OK);
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0]["rangeLabel"], "1–2.5");
        assert_eq!(entries[0]["color"], "#0071BC");
        assert_eq!(entries[4]["rangeLabel"], "8+");
    }

    #[tokio::test]
    async fn test_map_page() {
        let source = Arc::new(CannedSource::new(true));
        let app = setup_test_app(source.clone());
        let (status, body) = get(app, "/").await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("id=\"map\""));
        assert!(html.contains("8+"));
        assert!(html.contains("/static/map.js"));
        assert!(html.contains("Street Map"));
        // The page itself does not fetch feeds
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_map_page_leaves_errors_to_overlay_requests() {
        let source = Arc::new(CannedSource::failing_plates(1));
        let app = setup_test_app(source);

        let (status, _) = get(app.clone(), "/api/plates").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, body) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!String::from_utf8(body).unwrap().contains("feed-error"));

        let (status, _) = get(app, "/api/plates").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let source = Arc::new(CannedSource::slow(Duration::from_millis(20)));
        let state = AppState::with_source(
            source.clone(),
            MapView::default(),
            Duration::from_secs(60),
        );

        let (first, second) = tokio::join!(state.earthquakes(), state.earthquakes());
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_static_assets() {
        let app = setup_test_app(Arc::new(CannedSource::new(true)));
        let (status, body) = get(app.clone(), "/static/map.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("L.control.layers"));

        let (status, _) = get(app, "/static/style.css").await;
        assert_eq!(status, StatusCode::OK);
    }
}
