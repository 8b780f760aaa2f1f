use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use std::sync::Arc;

use super::model::MarketCacheDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::property_market_cache;
use crate::schema::property_market_cache::dsl::*;
use crate::utils::format_timestamp;
use estimo_core::errors::Result;
use estimo_core::market_calibration::{MarketCacheEntry, MarketCacheRepositoryTrait};
use estimo_market_data::RegionalStatsSet;

pub struct MarketCacheRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MarketCacheRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        MarketCacheRepository { pool, writer }
    }
}

#[async_trait]
impl MarketCacheRepositoryTrait for MarketCacheRepository {
    fn get_market_cache_entry(&self, zip: &str) -> Result<Option<MarketCacheEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let row = property_market_cache
            .find(zip)
            .select(MarketCacheDB::as_select())
            .first::<MarketCacheDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(MarketCacheEntry::try_from).transpose()
    }

    async fn upsert_market_cache_entry(
        &self,
        zip: &str,
        stats: &RegionalStatsSet,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        let row = MarketCacheDB::new(zip, stats, format_timestamp(&timestamp))?;
        self.writer
            .exec(move |conn| {
                // created_at keeps its first value
                diesel::insert_into(property_market_cache::table)
                    .values(&row)
                    .on_conflict(zipcode)
                    .do_update()
                    .set((
                        zipcode_stats.eq(excluded(zipcode_stats)),
                        neighbourhood_stats.eq(excluded(neighbourhood_stats)),
                        city_stats.eq(excluded(city_stats)),
                        state_stats.eq(excluded(state_stats)),
                        updated_at.eq(excluded(updated_at)),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn delete_market_cache_entry(&self, zip: &str) -> Result<usize> {
        let zip = zip.to_string();
        self.writer
            .exec(move |conn| {
                let deleted = diesel::delete(property_market_cache.find(zip))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(deleted)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, init, run_migrations, spawn_writer};
    use chrono::{Duration, TimeZone};
    use estimo_market_data::{RegionalStats, RegionalStatsGroup};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    async fn create_test_repository() -> (MarketCacheRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db").to_string_lossy().to_string();
        let pool = create_pool(&init(&db_path).unwrap()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (MarketCacheRepository::new(pool, writer), temp_dir)
    }

    fn stats(median: rust_decimal::Decimal) -> RegionalStatsSet {
        let group = RegionalStatsGroup {
            per_area: RegionalStats {
                average: median,
                median,
                support: 12,
            },
            ..Default::default()
        };
        RegionalStatsSet {
            zipcode: group,
            neighbourhood: group,
            city: RegionalStatsGroup::default(),
            state: group,
        }
    }

    #[tokio::test]
    async fn test_missing_entry_reads_as_none() {
        let (repo, _temp_dir) = create_test_repository().await;
        assert!(repo.get_market_cache_entry("01310100").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_and_read_back() {
        let (repo, _temp_dir) = create_test_repository().await;
        let ts = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();

        repo.upsert_market_cache_entry("01310100", &stats(dec!(9500.5)), ts)
            .await
            .unwrap();

        let entry = repo.get_market_cache_entry("01310100").unwrap().unwrap();
        assert_eq!(entry.zipcode, "01310100");
        assert_eq!(entry.stats, stats(dec!(9500.5)));
        assert_eq!(entry.created_at, ts);
        assert_eq!(entry.updated_at, ts);
    }

    #[tokio::test]
    async fn test_upsert_is_last_write_wins() {
        let (repo, _temp_dir) = create_test_repository().await;
        let first = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let second = first + Duration::days(3);

        repo.upsert_market_cache_entry("01310100", &stats(dec!(9000)), first)
            .await
            .unwrap();
        repo.upsert_market_cache_entry("01310100", &stats(dec!(9900)), second)
            .await
            .unwrap();

        let entry = repo.get_market_cache_entry("01310100").unwrap().unwrap();
        assert_eq!(entry.stats.zipcode.per_area.median, dec!(9900));
        assert_eq!(entry.created_at, first);
        assert_eq!(entry.updated_at, second);
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let (repo, _temp_dir) = create_test_repository().await;
        let ts = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        repo.upsert_market_cache_entry("22071000", &stats(dec!(12000)), ts)
            .await
            .unwrap();

        assert_eq!(repo.delete_market_cache_entry("22071000").await.unwrap(), 1);
        assert_eq!(repo.delete_market_cache_entry("22071000").await.unwrap(), 0);
        assert!(repo.get_market_cache_entry("22071000").unwrap().is_none());
    }
}
