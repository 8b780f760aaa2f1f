//! Batch population of per-property proximity snapshots.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use futures::future::join_all;
use log::{debug, error, info, warn};

use super::proximity_model::{
    PopulateSelection, PopulateSummary, ProximityRequest, ProximitySnapshot, ProximityStats,
};
use super::proximity_traits::{PropertyRepositoryTrait, ProximityPopulatorTrait, ProximityScorerTrait};
use crate::errors::Result;
use crate::settings::PopulatorSettings;
use crate::utils::Clock;

/// Applies the proximity scorer to stored properties.
///
/// Properties are processed in batches of `batch_size`. Items of one batch run
/// concurrently, batches run one after another with `pacing_ms` between them.
/// A failing item only increments the failure counter.
pub struct ProximityBatchPopulator {
    scorer: Arc<dyn ProximityScorerTrait>,
    repository: Arc<dyn PropertyRepositoryTrait>,
    clock: Arc<dyn Clock>,
    settings: PopulatorSettings,
}

impl ProximityBatchPopulator {
    pub fn new(
        scorer: Arc<dyn ProximityScorerTrait>,
        repository: Arc<dyn PropertyRepositoryTrait>,
        clock: Arc<dyn Clock>,
        settings: PopulatorSettings,
    ) -> Self {
        Self {
            scorer,
            repository,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &PopulatorSettings {
        &self.settings
    }

    /// Selection of stale snapshots using the configured threshold and limit.
    pub fn stale_selection(&self) -> PopulateSelection {
        PopulateSelection::Stale {
            older_than: Duration::days(self.settings.stale_after_days),
            offset: 0,
            limit: self.settings.limit,
        }
    }

    fn select_ids(&self, selection: &PopulateSelection) -> Result<Vec<String>> {
        let locations = match selection {
            PopulateSelection::Ids(ids) => return Ok(ids.clone()),
            PopulateSelection::Range { offset, limit } => {
                self.repository.list_with_coordinates(*offset, *limit)?
            }
            PopulateSelection::Stale {
                older_than,
                offset,
                limit,
            } => {
                let cutoff = self.clock.now() - *older_than;
                self.repository.list_stale(cutoff, *offset, *limit)?
            }
        };
        Ok(locations.into_iter().map(|l| l.id).collect())
    }

    async fn try_populate_one(&self, property_id: &str) -> Result<Option<ProximitySnapshot>> {
        let Some(location) = self.repository.get_property_location(property_id)? else {
            warn!("Property {} not found", property_id);
            return Ok(None);
        };
        let Some(coordinates) = location.coordinates else {
            warn!("Property {} has no coordinates", property_id);
            return Ok(None);
        };

        let request = ProximityRequest {
            coordinates,
            radius_meters: self.settings.radius_meters,
            categories: self.settings.categories.clone(),
            max_results_per_category: self.settings.max_results_per_category,
        };
        let result = match self.scorer.try_analyze(&request).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Proximity analysis for property {} failed: {}", property_id, e);
                return Ok(None);
            }
        };

        let snapshot =
            ProximitySnapshot::from_result(property_id, coordinates, result, self.clock.now());
        self.repository.save_proximity_snapshot(&snapshot).await?;
        debug!("Updated proximity data for property {}", property_id);
        Ok(Some(snapshot))
    }
}

#[async_trait]
impl ProximityPopulatorTrait for ProximityBatchPopulator {
    async fn populate_one(&self, property_id: &str) -> Option<ProximitySnapshot> {
        match self.try_populate_one(property_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Failed to populate proximity for property {}: {}", property_id, e);
                None
            }
        }
    }

    async fn populate_many(&self, selection: PopulateSelection) -> PopulateSummary {
        let mut summary = PopulateSummary::default();

        let ids = match self.select_ids(&selection) {
            Ok(ids) => ids,
            Err(e) => {
                error!("Failed to select properties for proximity population: {}", e);
                return summary;
            }
        };
        if ids.is_empty() {
            info!("No properties to process");
            return summary;
        }

        let batch_size = self.settings.batch_size.max(1);
        let pacing = StdDuration::from_millis(self.settings.pacing_ms);
        let batches: Vec<&[String]> = ids.chunks(batch_size).collect();
        let batch_count = batches.len();
        info!(
            "Processing {} properties in {} batches of up to {}",
            ids.len(),
            batch_count,
            batch_size
        );

        for (index, batch) in batches.into_iter().enumerate() {
            let outcomes = join_all(batch.iter().map(|id| self.populate_one(id))).await;
            for outcome in outcomes {
                summary.processed += 1;
                if outcome.is_some() {
                    summary.successful += 1;
                } else {
                    summary.failed += 1;
                }
            }

            info!(
                "Progress: {}/{} processed ({} successful, {} failed)",
                summary.processed,
                ids.len(),
                summary.successful,
                summary.failed
            );

            if index + 1 < batch_count && !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
        }

        info!(
            "Batch processing complete: {} successful, {} failed",
            summary.successful, summary.failed
        );
        summary
    }

    async fn clear_one(&self, property_id: &str) -> bool {
        match self.repository.clear_proximity(property_id).await {
            Ok(cleared) => {
                if cleared {
                    info!("Cleared proximity data for property {}", property_id);
                } else {
                    warn!("Property {} not found, nothing to clear", property_id);
                }
                cleared
            }
            Err(e) => {
                error!("Failed to clear proximity for property {}: {}", property_id, e);
                false
            }
        }
    }

    fn stats(&self) -> Result<ProximityStats> {
        self.repository.get_proximity_stats()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::{DateTime, TimeZone, Utc};
    use estimo_market_data::{Coordinates, ProviderError};

    use super::*;
    use crate::errors::{DatabaseError, Error};
    use crate::proximity::{PropertyLocation, ProximityResult};
    use crate::utils::ManualClock;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 3, 0, 0).unwrap()
    }

    /// Scorer that sleeps to simulate I/O and fails for one latitude.
    struct MockScorer {
        failing_lat: Option<f64>,
        in_flight: Mutex<usize>,
        peak_in_flight: Mutex<usize>,
    }

    impl MockScorer {
        fn new(failing_lat: Option<f64>) -> Self {
            Self {
                failing_lat,
                in_flight: Mutex::new(0),
                peak_in_flight: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl ProximityScorerTrait for MockScorer {
        async fn try_analyze(
            &self,
            request: &ProximityRequest,
        ) -> std::result::Result<ProximityResult, ProviderError> {
            {
                let mut in_flight = self.in_flight.lock().unwrap();
                *in_flight += 1;
                let mut peak = self.peak_in_flight.lock().unwrap();
                *peak = (*peak).max(*in_flight);
            }
            tokio::time::sleep(StdDuration::from_millis(100)).await;
            *self.in_flight.lock().unwrap() -= 1;

            if Some(request.coordinates.lat) == self.failing_lat {
                return Err(ProviderError::Timeout {
                    provider: "MOCK".to_string(),
                });
            }
            Ok(ProximityResult {
                overall_proximity_score: 42,
                has_beach_access: true,
                ..Default::default()
            })
        }
    }

    #[derive(Default)]
    struct MockRepository {
        locations: HashMap<String, PropertyLocation>,
        saved: Mutex<Vec<ProximitySnapshot>>,
        fail_save_for: Option<String>,
        stale_cutoffs: Mutex<Vec<DateTime<Utc>>>,
    }

    impl MockRepository {
        fn with_properties(count: usize) -> Self {
            let locations = (0..count)
                .map(|i| {
                    let id = format!("prop-{:02}", i);
                    let location = PropertyLocation {
                        id: id.clone(),
                        coordinates: Some(Coordinates::new(i as f64, -43.0)),
                        proximity_updated_at: None,
                    };
                    (id, location)
                })
                .collect();
            Self {
                locations,
                ..Default::default()
            }
        }

        fn sorted(&self) -> Vec<PropertyLocation> {
            let mut all: Vec<PropertyLocation> = self
                .locations
                .values()
                .filter(|l| l.coordinates.is_some())
                .cloned()
                .collect();
            all.sort_by(|a, b| a.id.cmp(&b.id));
            all
        }
    }

    #[async_trait]
    impl PropertyRepositoryTrait for MockRepository {
        fn get_property_location(&self, property_id: &str) -> Result<Option<PropertyLocation>> {
            Ok(self.locations.get(property_id).cloned())
        }

        fn list_with_coordinates(&self, offset: i64, limit: i64) -> Result<Vec<PropertyLocation>> {
            Ok(self
                .sorted()
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }

        fn list_stale(
            &self,
            cutoff: DateTime<Utc>,
            offset: i64,
            limit: i64,
        ) -> Result<Vec<PropertyLocation>> {
            self.stale_cutoffs.lock().unwrap().push(cutoff);
            Ok(self
                .sorted()
                .into_iter()
                .filter(|l| l.proximity_updated_at.map_or(true, |t| t < cutoff))
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }

        async fn save_proximity_snapshot(&self, snapshot: &ProximitySnapshot) -> Result<()> {
            if self.fail_save_for.as_deref() == Some(snapshot.property_id.as_str()) {
                return Err(Error::Database(DatabaseError::QueryFailed(
                    "database is locked".to_string(),
                )));
            }
            self.saved.lock().unwrap().push(snapshot.clone());
            Ok(())
        }

        async fn clear_proximity(&self, property_id: &str) -> Result<bool> {
            Ok(self.locations.contains_key(property_id))
        }

        fn get_proximity_stats(&self) -> Result<ProximityStats> {
            Ok(ProximityStats {
                total_properties: self.locations.len() as i64,
                ..Default::default()
            })
        }
    }

    fn populator(
        scorer: Arc<MockScorer>,
        repository: Arc<MockRepository>,
        batch_size: usize,
    ) -> ProximityBatchPopulator {
        ProximityBatchPopulator::new(
            scorer,
            repository,
            Arc::new(ManualClock::new(now())),
            PopulatorSettings {
                batch_size,
                ..Default::default()
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_twenty_five_properties_in_three_paced_batches() {
        let scorer = Arc::new(MockScorer::new(Some(3.0)));
        let mut repository = MockRepository::with_properties(25);
        repository.fail_save_for = Some("prop-12".to_string());
        let repository = Arc::new(repository);
        let populator = populator(scorer.clone(), repository.clone(), 10);

        let started = tokio::time::Instant::now();
        let summary = populator
            .populate_many(PopulateSelection::Range {
                offset: 0,
                limit: 100,
            })
            .await;
        let elapsed = started.elapsed();

        assert_eq!(
            summary,
            PopulateSummary {
                processed: 25,
                successful: 23,
                failed: 2,
            }
        );
        assert_eq!(*scorer.peak_in_flight.lock().unwrap(), 10);
        // three batches of 100 ms work plus two pacing delays of 1 s
        assert!(elapsed >= StdDuration::from_millis(2300), "{:?}", elapsed);
        assert!(elapsed < StdDuration::from_millis(3300), "{:?}", elapsed);

        let saved = repository.saved.lock().unwrap();
        assert_eq!(saved.len(), 23);
        assert!(saved.iter().all(|s| s.proximity_score == 42 && s.has_beach_access));
        assert!(saved.iter().all(|s| s.updated_at == now()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_batch_has_no_pacing_delay() {
        let populator = populator(
            Arc::new(MockScorer::new(None)),
            Arc::new(MockRepository::with_properties(4)),
            10,
        );
        let started = tokio::time::Instant::now();
        let summary = populator
            .populate_many(PopulateSelection::Range {
                offset: 0,
                limit: 10,
            })
            .await;
        assert_eq!(summary.successful, 4);
        assert!(started.elapsed() < StdDuration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_and_uncoordinated_ids_count_as_failures() {
        let mut repository = MockRepository::with_properties(2);
        repository.locations.insert(
            "no-coords".to_string(),
            PropertyLocation {
                id: "no-coords".to_string(),
                coordinates: None,
                proximity_updated_at: None,
            },
        );
        let populator = populator(Arc::new(MockScorer::new(None)), Arc::new(repository), 10);

        let summary = populator
            .populate_many(PopulateSelection::Ids(vec![
                "prop-00".to_string(),
                "no-coords".to_string(),
                "missing".to_string(),
            ]))
            .await;
        assert_eq!(
            summary,
            PopulateSummary {
                processed: 3,
                successful: 1,
                failed: 2,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_selection_uses_clock_cutoff() {
        let mut repository = MockRepository::with_properties(3);
        if let Some(fresh) = repository.locations.get_mut("prop-01") {
            fresh.proximity_updated_at = Some(now() - Duration::days(2));
        }
        let repository = Arc::new(repository);
        let populator = populator(Arc::new(MockScorer::new(None)), repository.clone(), 10);

        let summary = populator.populate_many(populator.stale_selection()).await;
        assert_eq!(summary.processed, 2);
        assert_eq!(
            *repository.stale_cutoffs.lock().unwrap(),
            vec![now() - Duration::days(30)]
        );
    }

    #[tokio::test]
    async fn test_clear_one_and_stats() {
        let repository = Arc::new(MockRepository::with_properties(3));
        let populator = populator(Arc::new(MockScorer::new(None)), repository, 10);
        assert!(populator.clear_one("prop-00").await);
        assert!(!populator.clear_one("unknown").await);
        assert_eq!(populator.stats().unwrap().total_properties, 3);
    }
}
