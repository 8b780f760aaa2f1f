use async_trait::async_trait;
use chrono::{DateTime, Utc};
use estimo_market_data::ProviderError;
use log::warn;

use super::proximity_model::{
    PopulateSelection, PopulateSummary, PropertyLocation, ProximityRequest, ProximityResult,
    ProximitySnapshot, ProximityStats,
};
use crate::errors::Result;

/// Landmark analysis around a coordinate.
#[async_trait]
pub trait ProximityScorerTrait: Send + Sync {
    /// Run the analysis, reporting provider failures.
    async fn try_analyze(
        &self,
        request: &ProximityRequest,
    ) -> std::result::Result<ProximityResult, ProviderError>;

    /// Run the analysis, degrading any failure to an empty result.
    async fn analyze(&self, request: &ProximityRequest) -> ProximityResult {
        match self.try_analyze(request).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Proximity analysis failed, returning empty result: {}", e);
                ProximityResult::empty()
            }
        }
    }
}

/// Property records carrying proximity snapshots.
#[async_trait]
pub trait PropertyRepositoryTrait: Send + Sync {
    fn get_property_location(&self, property_id: &str) -> Result<Option<PropertyLocation>>;

    /// Properties with coordinates, ordered by id.
    fn list_with_coordinates(&self, offset: i64, limit: i64) -> Result<Vec<PropertyLocation>>;

    /// Properties with coordinates whose snapshot is missing or older than
    /// `cutoff`, ordered by id.
    fn list_stale(
        &self,
        cutoff: DateTime<Utc>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PropertyLocation>>;

    async fn save_proximity_snapshot(&self, snapshot: &ProximitySnapshot) -> Result<()>;

    /// Reset the proximity fields of a property. Returns false when it does not exist.
    async fn clear_proximity(&self, property_id: &str) -> Result<bool>;

    fn get_proximity_stats(&self) -> Result<ProximityStats>;
}

/// Trait for proximity population operations
#[async_trait]
pub trait ProximityPopulatorTrait: Send + Sync {
    async fn populate_one(&self, property_id: &str) -> Option<ProximitySnapshot>;
    async fn populate_many(&self, selection: PopulateSelection) -> PopulateSummary;
    async fn clear_one(&self, property_id: &str) -> bool;
    fn stats(&self) -> Result<ProximityStats>;
}
