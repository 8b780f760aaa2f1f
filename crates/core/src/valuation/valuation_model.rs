//! Valuation domain models.

use estimo_market_data::{Coordinates, ResolvedLocation};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::market_calibration::{MarketInsight, MarketValidation};
use crate::proximity::ProximityResult;

/// The property being valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAttributes {
    pub coordinates: Coordinates,
    pub property_type: String,
    pub usage: Option<String>,
    pub rental_type: Option<String>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Usable area in square meters.
    pub area: Decimal,
    pub parking_spaces: u32,
    pub furnished: bool,
    /// Postal code, when the caller already knows it.
    pub zipcode: Option<String>,
}

/// A retrieved listing used as reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparable {
    pub id: String,
    pub property_type: Option<String>,
    pub usage: Option<String>,
    pub rental_type: Option<String>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: Decimal,
    pub parking_spaces: u32,
    pub furnished: bool,
    pub coordinates: Option<Coordinates>,
    pub price: Decimal,
    /// Similarity reported by the retrieval service, higher is closer.
    pub similarity_score: Option<f64>,
}

/// Attributes the comparable search matches against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableCriteria {
    pub coordinates: Coordinates,
    pub property_type: String,
    pub usage: Option<String>,
    pub rental_type: Option<String>,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: Decimal,
    pub parking_spaces: u32,
    pub furnished: bool,
}

impl From<&PropertyAttributes> for ComparableCriteria {
    fn from(attributes: &PropertyAttributes) -> Self {
        Self {
            coordinates: attributes.coordinates,
            property_type: attributes.property_type.clone(),
            usage: attributes.usage.clone(),
            rental_type: attributes.rental_type.clone(),
            bedrooms: attributes.bedrooms,
            bathrooms: attributes.bathrooms,
            area: attributes.area,
            parking_spaces: attributes.parking_spaces,
            furnished: attributes.furnished,
        }
    }
}

/// Accepted distance between a comparable and the criteria.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableTolerances {
    pub bedrooms: u32,
    pub bathrooms: u32,
    /// Relative area tolerance (0.3 = ±30%).
    pub area_percent: Decimal,
    pub parking_spaces: u32,
}

impl Default for ComparableTolerances {
    fn default() -> Self {
        Self {
            bedrooms: DEFAULT_BEDROOMS_TOLERANCE,
            bathrooms: DEFAULT_BATHROOMS_TOLERANCE,
            area_percent: DEFAULT_AREA_TOLERANCE,
            parking_spaces: DEFAULT_PARKING_TOLERANCE,
        }
    }
}

/// Request sent to the comparable retrieval service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableQuery {
    pub criteria: ComparableCriteria,
    pub tolerances: ComparableTolerances,
    pub radius_km: f64,
    pub match_count: usize,
    /// Regional median price per area, used to pre-rank comparables.
    pub regional_price_per_area: Option<Decimal>,
    /// Accepted relative deviation from the regional benchmark.
    pub max_price_deviation: Option<Decimal>,
}

/// Final result of one valuation.
///
/// Optional enrichments are `None` whenever they could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    /// Trimmed mean of comparable prices.
    pub estimated_price: Decimal,
    pub median_price: Decimal,
    pub avg_price: Decimal,
    pub refined_price: Option<Decimal>,
    pub avg_precision: u8,
    pub comparables: Vec<Comparable>,
    pub zipcode: Option<String>,
    pub location: Option<ResolvedLocation>,
    pub market_validation: Option<MarketValidation>,
    pub market_insight: Option<MarketInsight>,
    pub proximity_analysis: Option<ProximityResult>,
}
