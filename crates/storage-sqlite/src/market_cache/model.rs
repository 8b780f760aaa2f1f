//! Database model for cached regional statistics.

use diesel::prelude::*;
use estimo_core::market_calibration::MarketCacheEntry;
use estimo_core::Result;
use estimo_market_data::{RegionalStatsGroup, RegionalStatsSet};
use serde::{Deserialize, Serialize};

use crate::errors::IntoCore;
use crate::utils::parse_timestamp;

/// One row per zipcode; every statistics group is a JSON document.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::property_market_cache)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct MarketCacheDB {
    pub zipcode: String,
    pub zipcode_stats: String,
    pub neighbourhood_stats: String,
    pub city_stats: String,
    pub state_stats: String,
    pub created_at: String,
    pub updated_at: String,
}

impl MarketCacheDB {
    pub fn new(zipcode: &str, stats: &RegionalStatsSet, timestamp: String) -> Result<Self> {
        Ok(Self {
            zipcode: zipcode.to_string(),
            zipcode_stats: serde_json::to_string(&stats.zipcode).into_core()?,
            neighbourhood_stats: serde_json::to_string(&stats.neighbourhood).into_core()?,
            city_stats: serde_json::to_string(&stats.city).into_core()?,
            state_stats: serde_json::to_string(&stats.state).into_core()?,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        })
    }
}

impl TryFrom<MarketCacheDB> for MarketCacheEntry {
    type Error = estimo_core::Error;

    fn try_from(db: MarketCacheDB) -> Result<Self> {
        let group = |raw: &str| -> Result<RegionalStatsGroup> { serde_json::from_str(raw).into_core() };

        Ok(MarketCacheEntry {
            stats: RegionalStatsSet {
                zipcode: group(&db.zipcode_stats)?,
                neighbourhood: group(&db.neighbourhood_stats)?,
                city: group(&db.city_stats)?,
                state: group(&db.state_stats)?,
            },
            created_at: parse_timestamp(&db.created_at)?,
            updated_at: parse_timestamp(&db.updated_at)?,
            zipcode: db.zipcode,
        })
    }
}
