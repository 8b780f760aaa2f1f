//! Persistent TTL cache over regional market statistics.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use estimo_market_data::RegionalStatsSet;
use log::{debug, error, info};

use super::calibration_traits::{MarketCacheRepositoryTrait, MarketCalibrationCacheTrait};
use crate::constants::MARKET_CACHE_TTL_DAYS;
use crate::utils::Clock;

/// Cache of regional statistics keyed by normalized zipcode.
///
/// An entry is fresh while `now - updated_at <= ttl`. Expired entries stay in
/// the store until the next successful fetch overwrites them.
pub struct MarketCalibrationCache {
    repository: Arc<dyn MarketCacheRepositoryTrait>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl MarketCalibrationCache {
    pub fn new(repository: Arc<dyn MarketCacheRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(repository, clock, Duration::days(MARKET_CACHE_TTL_DAYS))
    }

    pub fn with_ttl(
        repository: Arc<dyn MarketCacheRepositoryTrait>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[async_trait]
impl MarketCalibrationCacheTrait for MarketCalibrationCache {
    async fn get(&self, zipcode: &str) -> Option<RegionalStatsSet> {
        let entry = match self.repository.get_market_cache_entry(zipcode) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!("Market cache miss for {}", zipcode);
                return None;
            }
            Err(e) => {
                error!("Failed to read market cache for {}: {}", zipcode, e);
                return None;
            }
        };

        let age = self.clock.now() - entry.updated_at;
        if age > self.ttl {
            info!(
                "Market cache entry for {} expired ({} days old)",
                zipcode,
                age.num_days()
            );
            return None;
        }

        debug!("Market cache hit for {}", zipcode);
        Some(entry.stats)
    }

    async fn put(&self, zipcode: &str, stats: &RegionalStatsSet) {
        let now = self.clock.now();
        match self
            .repository
            .upsert_market_cache_entry(zipcode, stats, now)
            .await
        {
            Ok(()) => debug!("Saved market stats for {} to cache", zipcode),
            Err(e) => error!("Failed to save market stats for {}: {}", zipcode, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::{DateTime, TimeZone, Utc};
    use estimo_market_data::{RegionalStats, RegionalStatsGroup};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::errors::{DatabaseError, Error, Result};
    use crate::market_calibration::MarketCacheEntry;
    use crate::utils::ManualClock;

    #[derive(Default)]
    struct InMemoryRepository {
        entries: Mutex<HashMap<String, MarketCacheEntry>>,
    }

    #[async_trait]
    impl MarketCacheRepositoryTrait for InMemoryRepository {
        fn get_market_cache_entry(&self, zipcode: &str) -> Result<Option<MarketCacheEntry>> {
            Ok(self.entries.lock().unwrap().get(zipcode).cloned())
        }

        async fn upsert_market_cache_entry(
            &self,
            zipcode: &str,
            stats: &RegionalStatsSet,
            updated_at: DateTime<Utc>,
        ) -> Result<()> {
            let mut entries = self.entries.lock().unwrap();
            let created_at = entries
                .get(zipcode)
                .map(|e| e.created_at)
                .unwrap_or(updated_at);
            entries.insert(
                zipcode.to_string(),
                MarketCacheEntry {
                    zipcode: zipcode.to_string(),
                    stats: *stats,
                    created_at,
                    updated_at,
                },
            );
            Ok(())
        }

        async fn delete_market_cache_entry(&self, zipcode: &str) -> Result<usize> {
            Ok(self.entries.lock().unwrap().remove(zipcode).map_or(0, |_| 1))
        }
    }

    struct BrokenRepository;

    #[async_trait]
    impl MarketCacheRepositoryTrait for BrokenRepository {
        fn get_market_cache_entry(&self, _zipcode: &str) -> Result<Option<MarketCacheEntry>> {
            Err(Error::Database(DatabaseError::ConnectionFailed(
                "disk unavailable".to_string(),
            )))
        }

        async fn upsert_market_cache_entry(
            &self,
            _zipcode: &str,
            _stats: &RegionalStatsSet,
            _updated_at: DateTime<Utc>,
        ) -> Result<()> {
            Err(Error::Database(DatabaseError::QueryFailed(
                "read-only".to_string(),
            )))
        }

        async fn delete_market_cache_entry(&self, _zipcode: &str) -> Result<usize> {
            Ok(0)
        }
    }

    fn stats(median: rust_decimal::Decimal) -> RegionalStatsSet {
        RegionalStatsSet {
            zipcode: RegionalStatsGroup {
                per_area: RegionalStats {
                    average: median,
                    median,
                    support: 12,
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 8, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_entry_is_fresh_until_ttl() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = MarketCalibrationCache::new(
            Arc::new(InMemoryRepository::default()),
            clock.clone(),
        );
        cache.put("01310100", &stats(dec!(9000))).await;

        clock.set(start() + cache.ttl() - Duration::milliseconds(1));
        assert_eq!(
            cache.get("01310100").await.map(|s| s.zipcode_price_per_area_median()),
            Some(dec!(9000))
        );

        clock.set(start() + cache.ttl() + Duration::milliseconds(1));
        assert!(cache.get("01310100").await.is_none());
    }

    #[tokio::test]
    async fn test_put_is_last_write_wins() {
        let clock = Arc::new(ManualClock::new(start()));
        let repository = Arc::new(InMemoryRepository::default());
        let cache = MarketCalibrationCache::new(repository.clone(), clock.clone());

        cache.put("01310100", &stats(dec!(9000))).await;
        clock.advance(Duration::days(2));
        cache.put("01310100", &stats(dec!(9500))).await;

        let entry = repository
            .get_market_cache_entry("01310100")
            .unwrap()
            .unwrap();
        assert_eq!(entry.stats.zipcode_price_per_area_median(), dec!(9500));
        assert_eq!(entry.created_at, start());
        assert_eq!(entry.updated_at, start() + Duration::days(2));
        assert_eq!(repository.entries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_ttl() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = MarketCalibrationCache::with_ttl(
            Arc::new(InMemoryRepository::default()),
            clock.clone(),
            Duration::days(7),
        );
        cache.put("01310100", &stats(dec!(9000))).await;

        clock.advance(Duration::days(8));
        assert!(cache.get("01310100").await.is_none());
    }

    #[tokio::test]
    async fn test_storage_errors_are_swallowed() {
        let cache = MarketCalibrationCache::new(
            Arc::new(BrokenRepository),
            Arc::new(ManualClock::new(start())),
        );
        cache.put("01310100", &stats(dec!(9000))).await;
        assert!(cache.get("01310100").await.is_none());
    }
}
