//! Process-lifetime cache for station lookups.
//!
//! Keys are the search coordinate rounded to 4 decimal places plus the
//! search radius, so lookups that differ only in sub-11-meter jitter hit
//! the same entry. The map is append-only with no eviction: fine for a
//! planning session, unbounded over a very long-lived process.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::Station;

/// `(lat, lon)` scaled by 1e4 and rounded, plus radius in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(i64, i64, u32);

impl CacheKey {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(lat: f64, lon: f64, radius_meters: u32) -> Self {
        Self(
            (lat * 1e4).round() as i64,
            (lon * 1e4).round() as i64,
            radius_meters,
        )
    }
}

/// Shared station cache. The mutex is held only for the lookup or insert,
/// never across network I/O.
#[derive(Debug, Default)]
pub struct StationCache {
    inner: Mutex<HashMap<CacheKey, Vec<Station>>>,
}

impl StationCache {
    pub fn get(&self, key: CacheKey) -> Option<Vec<Station>> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    pub fn insert(&self, key: CacheKey, stations: Vec<Station>) {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key, stations);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
