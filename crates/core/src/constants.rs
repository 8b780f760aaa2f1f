use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub use estimo_market_data::ZIPCODE_LENGTH;

/// Days a regional statistics cache entry stays valid.
pub const MARKET_CACHE_TTL_DAYS: i64 = 30;

/// Days an in-process proximity analysis stays valid.
pub const PROXIMITY_CACHE_TTL_DAYS: i64 = 30;

/// Deviation (percent) beyond which an estimate is classified above or below market.
pub const MARKET_DEVIATION_BAND_PERCENT: Decimal = dec!(15);

/// Refinement only applies when confidence is strictly greater than this.
pub const REFINEMENT_CONFIDENCE_THRESHOLD: u8 = 50;

/// Largest relative correction a single refinement may apply.
pub const MAX_ADJUSTMENT_FACTOR: Decimal = dec!(0.1);

/// Decimal places of the reported market deviation percent
pub const DEVIATION_DECIMAL_PRECISION: u32 = 2;

// Confidence weights per granularity with data
pub const CONFIDENCE_ZIPCODE_WEIGHT: u8 = 40;
pub const CONFIDENCE_NEIGHBOURHOOD_WEIGHT: u8 = 30;
pub const CONFIDENCE_CITY_WEIGHT: u8 = 20;
pub const CONFIDENCE_BASE: u8 = 10;
pub const CONFIDENCE_MAX: u8 = 100;

/// Comparable search radius
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 20.0;

/// Comparables requested per valuation
pub const DEFAULT_MATCH_COUNT: usize = 20;

pub const DEFAULT_BEDROOMS_TOLERANCE: u32 = 1;
pub const DEFAULT_BATHROOMS_TOLERANCE: u32 = 1;
pub const DEFAULT_AREA_TOLERANCE: Decimal = dec!(0.3);
pub const DEFAULT_PARKING_TOLERANCE: u32 = 1;

/// Relative price deviation from the regional benchmark accepted by the
/// comparable search when a benchmark is known.
pub const DEFAULT_MAX_PRICE_DEVIATION: Decimal = dec!(0.5);

/// Mean Earth radius for great-circle distances
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Minimum individual proximity score for an access flag.
pub const ACCESS_SCORE_BAR: u8 = 20;

/// Landmark search radius used for a valuation
pub const DEFAULT_PROXIMITY_RADIUS_METERS: f64 = 1000.0;

pub const DEFAULT_MAX_RESULTS_PER_CATEGORY: usize = 3;

/// Landmark search radius used when populating property snapshots
pub const POPULATOR_RADIUS_METERS: f64 = 2000.0;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_BATCH_PACING_MS: u64 = 1000;
pub const DEFAULT_STALE_AFTER_DAYS: i64 = 30;
pub const DEFAULT_POPULATE_LIMIT: i64 = 100;
