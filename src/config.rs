//! Configuration management for quakemap using the prefer crate.
//!
//! Settings start from built-in defaults, then a discovered (or explicit)
//! `quakemap.{toml,yaml,json}` file is applied, then environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::map::MapView;

/// Default USGS feed: all earthquakes in the past week.
pub const DEFAULT_EARTHQUAKE_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// Default plate boundary feed (PB2002).
pub const DEFAULT_PLATES_FEED_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

/// Default output file for `quakemap render`.
pub const DEFAULT_OUTPUT_FILENAME: &str = "quakemap.html";

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("Invalid URL for {key}: {source}")]
    InvalidUrl {
        key: &'static str,
        source: url::ParseError,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Earthquake GeoJSON feed.
    pub earthquake_feed_url: Url,
    /// Tectonic plate boundary GeoJSON feed.
    pub plates_feed_url: Url,
    /// User agent for HTTP requests (None = built-in default).
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// How long fetched layers are served from memory, in seconds.
    pub cache_ttl_secs: u64,
    /// Initial map view.
    pub map_view: MapView,
    /// Output file for static rendering.
    pub output_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            earthquake_feed_url: Url::parse(DEFAULT_EARTHQUAKE_FEED_URL)
                .expect("default earthquake feed URL is valid"),
            plates_feed_url: Url::parse(DEFAULT_PLATES_FEED_URL)
                .expect("default plates feed URL is valid"),
            user_agent: None,
            request_timeout_secs: 30,
            cache_ttl_secs: 300,
            map_view: MapView::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Apply `QUAKEMAP_*` overrides from a variable lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("QUAKEMAP_EARTHQUAKE_FEED_URL") {
            tracing::debug!("Using QUAKEMAP_EARTHQUAKE_FEED_URL from environment: {}", url);
            self.earthquake_feed_url = parse_url("QUAKEMAP_EARTHQUAKE_FEED_URL", &url)?;
        }
        if let Some(url) = lookup("QUAKEMAP_PLATES_FEED_URL") {
            tracing::debug!("Using QUAKEMAP_PLATES_FEED_URL from environment: {}", url);
            self.plates_feed_url = parse_url("QUAKEMAP_PLATES_FEED_URL", &url)?;
        }
        if let Some(timeout) = lookup("QUAKEMAP_REQUEST_TIMEOUT") {
            self.request_timeout_secs =
                timeout
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "QUAKEMAP_REQUEST_TIMEOUT",
                        value: timeout.clone(),
                    })?;
        }
        if let Some(user_agent) = lookup("QUAKEMAP_USER_AGENT") {
            self.user_agent = Some(user_agent);
        }
        Ok(())
    }
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl { key, source })
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Earthquake feed URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earthquake_feed_url: Option<String>,
    /// Plate boundary feed URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plates_feed_url: Option<String>,
    /// User agent string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Layer cache TTL in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl: Option<u64>,
    /// Initial map view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapView>,
    /// Output file for `render`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers quakemap config files in standard locations.
    pub async fn load() -> Result<Self, ConfigError> {
        match prefer::load("quakemap").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => Self::load_from_path(path).await,
                None => Ok(Self::default()),
            },
            // No config file found
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse config text in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(
        &self,
        settings: &mut Settings,
        base_dir: &Path,
    ) -> Result<(), ConfigError> {
        if let Some(ref url) = self.earthquake_feed_url {
            settings.earthquake_feed_url = parse_url("earthquake_feed_url", url)?;
        }
        if let Some(ref url) = self.plates_feed_url {
            settings.plates_feed_url = parse_url("plates_feed_url", url)?;
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout_secs = timeout;
        }
        if let Some(ttl) = self.cache_ttl {
            settings.cache_ttl_secs = ttl;
        }
        if let Some(view) = self.map {
            settings.map_view = view;
        }
        if let Some(ref output) = self.output {
            settings.output_path = self.resolve_path(output, base_dir);
        }
        Ok(())
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
}

/// Load settings with explicit options.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), ConfigError> {
    let config = match options.config_path {
        Some(ref path) => Config::load_from_path(path).await?,
        None => Config::load().await?,
    };

    let mut settings = Settings::default();
    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    config.apply_to_settings(&mut settings, &base_dir)?;

    // Environment variables take highest precedence
    settings.apply_env_overrides(|key| std::env::var(key).ok())?;

    Ok((settings, config))
}
