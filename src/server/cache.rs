//! In-memory cache for fetched layers.
//!
//! The upstream feeds update every few minutes, so layers are kept for a
//! TTL instead of being refetched on every request. Failed fetches are never
//! cached.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::feeds::FeedKind;
use crate::render::{EarthquakeLayer, FeedStatus, PlateLayer};

/// A cached value with expiration time.
struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

impl<T: Clone> CacheEntry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    fn get(&self) -> Option<T> {
        if self.is_expired() {
            None
        } else {
            Some(self.value.clone())
        }
    }
}

/// Cache for the two overlay layers plus the last status of each feed.
pub struct LayerCache {
    earthquakes: RwLock<Option<CacheEntry<Arc<EarthquakeLayer>>>>,
    plates: RwLock<Option<CacheEntry<Arc<PlateLayer>>>>,
    statuses: RwLock<BTreeMap<FeedKind, FeedStatus>>,
    ttl: Duration,
}

impl LayerCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            earthquakes: RwLock::new(None),
            plates: RwLock::new(None),
            statuses: RwLock::new(BTreeMap::new()),
            ttl,
        }
    }

    /// Get the cached earthquake layer, or None if expired/missing.
    pub fn get_earthquakes(&self) -> Option<Arc<EarthquakeLayer>> {
        self.earthquakes
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().and_then(|e| e.get()))
    }

    pub fn set_earthquakes(&self, layer: Arc<EarthquakeLayer>) {
        if let Ok(mut guard) = self.earthquakes.write() {
            *guard = Some(CacheEntry::new(layer, self.ttl));
        }
    }

    /// Get the cached plate layer, or None if expired/missing.
    pub fn get_plates(&self) -> Option<Arc<PlateLayer>> {
        self.plates
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().and_then(|e| e.get()))
    }

    pub fn set_plates(&self, layer: Arc<PlateLayer>) {
        if let Ok(mut guard) = self.plates.write() {
            *guard = Some(CacheEntry::new(layer, self.ttl));
        }
    }

    /// Record the latest outcome for a feed.
    pub fn set_status(&self, kind: FeedKind, status: FeedStatus) {
        if let Ok(mut guard) = self.statuses.write() {
            guard.insert(kind, status);
        }
    }

    pub fn statuses(&self) -> BTreeMap<FeedKind, FeedStatus> {
        self.statuses
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}
