use async_trait::async_trait;
use chrono::{DateTime, Utc};
use estimo_market_data::RegionalStatsSet;
use rust_decimal::Decimal;

use super::calibration_model::{MarketCacheEntry, MarketValidation, MarketValidationOutcome};
use crate::errors::Result;

/// Persistent store of regional statistics keyed by normalized zipcode.
#[async_trait]
pub trait MarketCacheRepositoryTrait: Send + Sync {
    fn get_market_cache_entry(&self, zipcode: &str) -> Result<Option<MarketCacheEntry>>;

    /// Insert or replace the entry for `zipcode` (last write wins).
    async fn upsert_market_cache_entry(
        &self,
        zipcode: &str,
        stats: &RegionalStatsSet,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    async fn delete_market_cache_entry(&self, zipcode: &str) -> Result<usize>;
}

/// TTL cache over regional statistics.
///
/// Both operations are best effort and never fail: a storage problem reads
/// as a miss and a failed write is dropped.
#[async_trait]
pub trait MarketCalibrationCacheTrait: Send + Sync {
    async fn get(&self, zipcode: &str) -> Option<RegionalStatsSet>;
    async fn put(&self, zipcode: &str, stats: &RegionalStatsSet);
}

/// Market calibration operations.
#[async_trait]
pub trait MarketCalibrationServiceTrait: Send + Sync {
    /// Regional statistics for a normalized zipcode, from cache or provider.
    async fn lookup_stats(&self, zipcode: &str) -> Option<RegionalStatsSet>;

    /// Zipcode-level median price per area unit.
    async fn get_regional_price_per_area(&self, zipcode: &str) -> Option<Decimal>;

    async fn evaluate(
        &self,
        zipcode: &str,
        estimated_price: Decimal,
        area: Decimal,
    ) -> Option<MarketValidation>;

    /// Evaluate and refine an estimate in one step.
    async fn validate(
        &self,
        zipcode: &str,
        estimated_price: Decimal,
        area: Decimal,
    ) -> MarketValidationOutcome;

    /// Evaluate and refine against statistics the caller already holds.
    fn validate_with_stats(
        &self,
        stats: &RegionalStatsSet,
        estimated_price: Decimal,
        area: Decimal,
    ) -> MarketValidationOutcome;
}
