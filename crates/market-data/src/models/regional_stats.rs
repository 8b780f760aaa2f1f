use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate price statistics over one geographic granularity.
///
/// `support` is the number of samples backing the values; zero means the
/// provider has no data at this granularity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionalStats {
    pub average: Decimal,
    pub median: Decimal,
    pub support: u64,
}

impl RegionalStats {
    pub fn has_data(&self) -> bool {
        self.support > 0
    }
}

/// Global, per-area and per-room statistics for one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalStatsGroup {
    pub global: RegionalStats,
    #[serde(alias = "per_m2", alias = "per_area")]
    pub per_area: RegionalStats,
    #[serde(alias = "per_room")]
    pub per_room: RegionalStats,
}

/// The four granularities returned by one market statistics lookup.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalStatsSet {
    pub zipcode: RegionalStatsGroup,
    pub neighbourhood: RegionalStatsGroup,
    pub city: RegionalStatsGroup,
    pub state: RegionalStatsGroup,
}

impl RegionalStatsSet {
    /// Median price per area unit at zipcode level, the benchmark used for
    /// calibration.
    pub fn zipcode_price_per_area_median(&self) -> Decimal {
        self.zipcode.per_area.median
    }
}
