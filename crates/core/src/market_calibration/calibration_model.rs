//! Market calibration domain models.

use chrono::{DateTime, Utc};
use estimo_market_data::{RegionalStatsGroup, RegionalStatsSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position of an estimate relative to the regional benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketReality {
    AboveMarket,
    BelowMarket,
    WithinMarket,
}

impl MarketReality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AboveMarket => "above_market",
            Self::BelowMarket => "below_market",
            Self::WithinMarket => "within_market",
        }
    }
}

/// Persisted regional statistics for one zipcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketCacheEntry {
    pub zipcode: String,
    pub stats: RegionalStatsSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comparison of an estimate against regional statistics. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketValidation {
    pub zipcode: RegionalStatsGroup,
    pub neighbourhood: RegionalStatsGroup,
    pub city: RegionalStatsGroup,
    pub state: RegionalStatsGroup,
    /// Evidence-weighted confidence in `[0, 100]`.
    pub confidence: u8,
    pub price_per_area_estimate: Decimal,
    pub price_per_area_median: Decimal,
    pub market_reality: MarketReality,
    /// Signed deviation of the estimate from the median, in percent, 2 decimals.
    pub market_deviation_percent: Decimal,
}

impl MarketValidation {
    pub fn stats(&self) -> RegionalStatsSet {
        RegionalStatsSet {
            zipcode: self.zipcode,
            neighbourhood: self.neighbourhood,
            city: self.city,
            state: self.state,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    AboveMarketAdjustment,
    BelowMarketAdjustment,
    WithinMarket,
}

/// Human-readable explanation of a calibration outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInsight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinedPrice {
    pub refined_price: Decimal,
    pub insight: Option<MarketInsight>,
}

/// Result of a full market validation of one estimate.
///
/// `refined_price` equals the original price whenever calibration was not
/// possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketValidationOutcome {
    pub validation: Option<MarketValidation>,
    pub insight: Option<MarketInsight>,
    pub refined_price: Decimal,
}

impl MarketValidationOutcome {
    pub fn unavailable(original_price: Decimal) -> Self {
        Self {
            validation: None,
            insight: None,
            refined_price: original_price,
        }
    }
}
