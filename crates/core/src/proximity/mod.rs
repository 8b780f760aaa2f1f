//! Proximity - landmark scoring around a coordinate and batch population of
//! per-property proximity snapshots.

mod categories;
mod geo;
mod proximity_cache;
mod proximity_model;
mod proximity_populator;
mod proximity_scorer;
mod proximity_traits;

pub use categories::{category_profile, is_likely_beach, CategoryProfile, NameFilter};
pub use geo::haversine_distance;
pub use proximity_cache::{cache_key, ProximityCache, ProximityCacheStats};
pub use proximity_model::{
    Landmark, PopulateSelection, PopulateSummary, PropertyLocation, ProximityRequest,
    ProximityResult, ProximitySnapshot, ProximityStats,
};
pub use proximity_populator::ProximityBatchPopulator;
pub use proximity_scorer::ProximityScorer;
pub use proximity_traits::{
    PropertyRepositoryTrait, ProximityPopulatorTrait, ProximityScorerTrait,
};
