use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::{PropertyDB, ProximityChangesetDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::properties::dsl::*;
use crate::utils::format_timestamp;
use estimo_core::errors::{DatabaseError, Error, Result};
use estimo_core::proximity::{
    PropertyLocation, PropertyRepositoryTrait, ProximitySnapshot, ProximityStats,
};

pub struct PropertyRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PropertyRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PropertyRepository { pool, writer }
    }
}

#[async_trait]
impl PropertyRepositoryTrait for PropertyRepository {
    fn get_property_location(&self, property_id: &str) -> Result<Option<PropertyLocation>> {
        let mut conn = get_connection(&self.pool)?;
        let row = properties
            .find(property_id)
            .select(PropertyDB::as_select())
            .first::<PropertyDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(PropertyLocation::try_from).transpose()
    }

    fn list_with_coordinates(&self, offset: i64, limit: i64) -> Result<Vec<PropertyLocation>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = properties
            .filter(lat.is_not_null().and(lng.is_not_null()))
            .order(id.asc())
            .offset(offset.max(0))
            .limit(limit.max(0))
            .select(PropertyDB::as_select())
            .load::<PropertyDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter().map(PropertyLocation::try_from).collect()
    }

    fn list_stale(
        &self,
        cutoff: DateTime<Utc>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<PropertyLocation>> {
        let cutoff = format_timestamp(&cutoff);
        let mut conn = get_connection(&self.pool)?;
        let rows = properties
            .filter(lat.is_not_null().and(lng.is_not_null()))
            .filter(
                proximity_updated_at
                    .is_null()
                    .or(proximity_updated_at.assume_not_null().lt(cutoff)),
            )
            .order(id.asc())
            .offset(offset.max(0))
            .limit(limit.max(0))
            .select(PropertyDB::as_select())
            .load::<PropertyDB>(&mut conn)
            .map_err(StorageError::from)?;

        debug!("Found {} properties with stale proximity data", rows.len());
        rows.into_iter().map(PropertyLocation::try_from).collect()
    }

    async fn save_proximity_snapshot(&self, snapshot: &ProximitySnapshot) -> Result<()> {
        let changes = ProximityChangesetDB::from_snapshot(snapshot)?;
        let property_id = snapshot.property_id.clone();
        self.writer
            .exec(move |conn| {
                let updated = diesel::update(properties.find(&property_id))
                    .set(&changes)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "property {}",
                        property_id
                    ))));
                }
                Ok(())
            })
            .await
    }

    async fn clear_proximity(&self, property_id: &str) -> Result<bool> {
        let property_id = property_id.to_string();
        self.writer
            .exec(move |conn| {
                let updated = diesel::update(properties.find(&property_id))
                    .set(&ProximityChangesetDB::cleared())
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(updated > 0)
            })
            .await
    }

    fn get_proximity_stats(&self) -> Result<ProximityStats> {
        let mut conn = get_connection(&self.pool)?;

        let total_properties = properties
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        let scores = properties
            .filter(proximity_updated_at.is_not_null())
            .select(proximity_score)
            .load::<Option<i32>>(&mut conn)
            .map_err(StorageError::from)?;
        let with_proximity_data = scores.len() as i64;

        let scored: Vec<i32> = scores.into_iter().flatten().collect();
        let average_proximity_score = if scored.is_empty() {
            0
        } else {
            let sum: i64 = scored.iter().map(|s| i64::from(*s)).sum();
            (sum as f64 / scored.len() as f64).round().clamp(0.0, 100.0) as u8
        };

        let beach_access_count = properties
            .filter(has_beach_access.eq(true))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        let metro_access_count = properties
            .filter(has_metro_access.eq(true))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        let shopping_access_count = properties
            .filter(has_shopping_access.eq(true))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(ProximityStats {
            total_properties,
            with_proximity_data,
            without_proximity_data: total_properties - with_proximity_data,
            average_proximity_score,
            beach_access_count,
            metro_access_count,
            shopping_access_count,
        })
    }
}
