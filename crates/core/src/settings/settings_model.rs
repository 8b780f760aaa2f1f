//! Settings models.

use estimo_market_data::LandmarkCategory;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::valuation::ComparableTolerances;

/// Parameters of the valuation pipeline and of market calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValuationSettings {
    /// Lifetime of a regional statistics cache entry.
    pub market_cache_ttl_days: i64,
    pub deviation_band_percent: Decimal,
    pub confidence_threshold: u8,
    pub max_adjustment_factor: Decimal,
    pub search_radius_km: f64,
    pub match_count: usize,
    pub tolerances: ComparableTolerances,
    pub max_price_deviation: Option<Decimal>,
}

impl Default for ValuationSettings {
    fn default() -> Self {
        Self {
            market_cache_ttl_days: MARKET_CACHE_TTL_DAYS,
            deviation_band_percent: MARKET_DEVIATION_BAND_PERCENT,
            confidence_threshold: REFINEMENT_CONFIDENCE_THRESHOLD,
            max_adjustment_factor: MAX_ADJUSTMENT_FACTOR,
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            match_count: DEFAULT_MATCH_COUNT,
            tolerances: ComparableTolerances::default(),
            max_price_deviation: Some(DEFAULT_MAX_PRICE_DEVIATION),
        }
    }
}

/// Parameters of a proximity analysis made during a valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProximitySettings {
    pub radius_meters: f64,
    pub max_results_per_category: usize,
    pub categories: Vec<LandmarkCategory>,
    pub cache_ttl_days: i64,
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_PROXIMITY_RADIUS_METERS,
            max_results_per_category: DEFAULT_MAX_RESULTS_PER_CATEGORY,
            categories: vec![
                LandmarkCategory::Beach,
                LandmarkCategory::ShoppingMall,
                LandmarkCategory::Hospital,
                LandmarkCategory::School,
                LandmarkCategory::Park,
            ],
            cache_ttl_days: PROXIMITY_CACHE_TTL_DAYS,
        }
    }
}

/// Parameters of batch proximity population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PopulatorSettings {
    pub radius_meters: f64,
    pub max_results_per_category: usize,
    pub categories: Vec<LandmarkCategory>,
    pub batch_size: usize,
    pub pacing_ms: u64,
    pub stale_after_days: i64,
    pub limit: i64,
}

impl Default for PopulatorSettings {
    fn default() -> Self {
        Self {
            radius_meters: POPULATOR_RADIUS_METERS,
            max_results_per_category: DEFAULT_MAX_RESULTS_PER_CATEGORY,
            categories: vec![
                LandmarkCategory::Beach,
                LandmarkCategory::MetroStation,
                LandmarkCategory::ShoppingMall,
                LandmarkCategory::Hospital,
                LandmarkCategory::School,
                LandmarkCategory::Park,
            ],
            batch_size: DEFAULT_BATCH_SIZE,
            pacing_ms: DEFAULT_BATCH_PACING_MS,
            stale_after_days: DEFAULT_STALE_AFTER_DAYS,
            limit: DEFAULT_POPULATE_LIMIT,
        }
    }
}
