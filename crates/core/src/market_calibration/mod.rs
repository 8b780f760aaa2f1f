//! Market calibration - regional statistics cache, market deviation
//! evaluation and bounded price refinement.

mod calibration_cache;
mod calibration_model;
mod calibration_service;
mod calibration_traits;
mod deviation_classifier;

pub use calibration_cache::MarketCalibrationCache;
pub use calibration_model::{
    InsightType, MarketCacheEntry, MarketInsight, MarketReality, MarketValidation,
    MarketValidationOutcome, RefinedPrice,
};
pub use calibration_service::{normalize_zipcode, MarketCalibrationService};
pub use calibration_traits::{
    MarketCacheRepositoryTrait, MarketCalibrationCacheTrait, MarketCalibrationServiceTrait,
};
pub use deviation_classifier::MarketDeviationClassifier;
