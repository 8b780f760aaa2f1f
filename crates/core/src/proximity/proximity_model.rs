//! Proximity domain models.

use chrono::{DateTime, Duration, Utc};
use estimo_market_data::{Coordinates, LandmarkCategory};
use serde::{Deserialize, Serialize};

/// A scored search result near the analyzed point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub category: LandmarkCategory,
    pub rating: Option<f64>,
    /// Great-circle distance from the analyzed point.
    pub distance_meters: f64,
    /// `0..=100`, 100 at the point itself.
    pub proximity_score: u8,
}

/// Parameters of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityRequest {
    pub coordinates: Coordinates,
    pub radius_meters: f64,
    pub categories: Vec<LandmarkCategory>,
    pub max_results_per_category: usize,
}

/// Landmarks around a point with the derived scores and access flags.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityResult {
    pub landmarks: Vec<Landmark>,
    pub overall_proximity_score: u8,
    pub has_beach_access: bool,
    pub has_metro_access: bool,
    pub has_shopping_access: bool,
    pub has_hospital_access: bool,
    pub has_school_access: bool,
    pub has_park_access: bool,
    pub cache_hit: bool,
}

impl ProximityResult {
    /// All-false, zero-score result used when analysis is impossible.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Coordinates of a stored property, when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyLocation {
    pub id: String,
    pub coordinates: Option<Coordinates>,
    pub proximity_updated_at: Option<DateTime<Utc>>,
}

/// Denormalized proximity fields written onto a property record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximitySnapshot {
    pub property_id: String,
    pub coordinates: Coordinates,
    pub proximity_score: u8,
    pub has_beach_access: bool,
    pub has_metro_access: bool,
    pub has_shopping_access: bool,
    pub has_hospital_access: bool,
    pub has_school_access: bool,
    pub has_park_access: bool,
    pub landmarks: Vec<Landmark>,
    pub updated_at: DateTime<Utc>,
}

impl ProximitySnapshot {
    pub fn from_result(
        property_id: &str,
        coordinates: Coordinates,
        result: ProximityResult,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            property_id: property_id.to_string(),
            coordinates,
            proximity_score: result.overall_proximity_score,
            has_beach_access: result.has_beach_access,
            has_metro_access: result.has_metro_access,
            has_shopping_access: result.has_shopping_access,
            has_hospital_access: result.has_hospital_access,
            has_school_access: result.has_school_access,
            has_park_access: result.has_park_access,
            landmarks: result.landmarks,
            updated_at,
        }
    }
}

/// Aggregate view over stored proximity snapshots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityStats {
    pub total_properties: i64,
    pub with_proximity_data: i64,
    pub without_proximity_data: i64,
    pub average_proximity_score: u8,
    pub beach_access_count: i64,
    pub metro_access_count: i64,
    pub shopping_access_count: i64,
}

/// Which properties a batch run covers.
#[derive(Debug, Clone, PartialEq)]
pub enum PopulateSelection {
    /// Exactly these properties. Ids without coordinates count as failures.
    Ids(Vec<String>),
    /// A page of properties with coordinates.
    Range { offset: i64, limit: i64 },
    /// A page of properties with coordinates whose snapshot is missing or
    /// older than `older_than`.
    Stale {
        older_than: Duration,
        offset: i64,
        limit: i64,
    },
}

/// Outcome counters of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulateSummary {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
}
