//! In-process TTL cache of proximity analyses.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use estimo_market_data::{Coordinates, LandmarkCategory};
use log::debug;
use serde::Serialize;

use super::proximity_model::ProximityResult;
use crate::constants::PROXIMITY_CACHE_TTL_DAYS;
use crate::utils::Clock;

#[derive(Debug, Clone)]
struct CachedProximity {
    result: ProximityResult,
    stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityCacheStats {
    pub entries: usize,
}

/// Key of an analysis: coordinates on a 0.001° grid (about 111 m), radius and
/// the sorted category set.
///
/// # Examples
///
/// ```
/// use estimo_core::proximity::cache_key;
/// use estimo_market_data::{Coordinates, LandmarkCategory};
///
/// let a = cache_key(
///     &Coordinates::new(-22.97112, -43.18221),
///     1000.0,
///     &[LandmarkCategory::Park, LandmarkCategory::Beach],
/// );
/// let b = cache_key(
///     &Coordinates::new(-22.97094, -43.18189),
///     1000.0,
///     &[LandmarkCategory::Beach, LandmarkCategory::Park],
/// );
/// assert_eq!(a, b);
/// ```
pub fn cache_key(coordinates: &Coordinates, radius_meters: f64, categories: &[LandmarkCategory]) -> String {
    let mut sorted = categories.to_vec();
    sorted.sort();
    sorted.dedup();
    let categories: Vec<&str> = sorted.iter().map(|c| c.as_str()).collect();
    format!(
        "{},{},{},{}",
        (coordinates.lat * 1000.0).round() as i64,
        (coordinates.lng * 1000.0).round() as i64,
        radius_meters,
        categories.join(",")
    )
}

/// Concurrent map of analyses with a fixed time to live.
///
/// Created once at startup and shared by every scorer call. Expired entries
/// are dropped on read or by [`purge_expired`](Self::purge_expired).
pub struct ProximityCache {
    entries: DashMap<String, CachedProximity>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl ProximityCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(clock, Duration::days(PROXIMITY_CACHE_TTL_DAYS))
    }

    pub fn with_ttl(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            ttl,
        }
    }

    pub fn get(&self, key: &str) -> Option<ProximityResult> {
        let now = self.clock.now();
        {
            let entry = self.entries.get(key)?;
            if now - entry.stored_at <= self.ttl {
                return Some(entry.result.clone());
            }
        }
        debug!("Proximity cache entry {} expired", key);
        self.entries
            .remove_if(key, |_, entry| now - entry.stored_at > self.ttl);
        None
    }

    pub fn insert(&self, key: String, result: ProximityResult) {
        self.entries.insert(
            key,
            CachedProximity {
                result,
                stored_at: self.clock.now(),
            },
        );
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now - entry.stored_at <= self.ttl);
        before.saturating_sub(self.entries.len())
    }

    pub fn stats(&self) -> ProximityCacheStats {
        ProximityCacheStats {
            entries: self.entries.len(),
        }
    }
}
