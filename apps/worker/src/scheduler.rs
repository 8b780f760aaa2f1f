//! Background scheduler for periodic proximity refresh.
//!
//! Each run purges expired proximity cache entries and repopulates the
//! properties whose proximity snapshot is missing or stale.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::main_lib::AppState;
use estimo_core::proximity::{PopulateSummary, ProximityPopulatorTrait};

/// Runs refreshes every `every` until the process receives Ctrl-C.
///
/// The first refresh starts immediately.
pub async fn run_proximity_scheduler(state: Arc<AppState>, every: Duration) {
    info!(
        "Proximity refresh scheduler started ({}s interval)",
        every.as_secs()
    );
    let mut refresh_interval = interval(every);

    loop {
        tokio::select! {
            _ = refresh_interval.tick() => {
                run_proximity_refresh(&state).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested, stopping proximity scheduler");
                break;
            }
        }
    }
}

/// Runs a single refresh.
pub async fn run_proximity_refresh(state: &AppState) -> PopulateSummary {
    let purged = state.proximity_cache.purge_expired();
    if purged > 0 {
        debug!("Purged {} expired proximity cache entries", purged);
    }

    if !state.landmarks_enabled {
        debug!("Proximity refresh skipped: no landmark provider configured");
        return PopulateSummary::default();
    }

    info!("Running scheduled proximity refresh...");
    let summary = state
        .populator
        .populate_many(state.populator.stale_selection())
        .await;
    info!(
        "Scheduled proximity refresh completed: {} processed, {} successful, {} failed",
        summary.processed, summary.successful, summary.failed
    );

    match state.populator.stats() {
        Ok(stats) => info!(
            "Proximity coverage: {}/{} properties, average score {}",
            stats.with_proximity_data, stats.total_properties, stats.average_proximity_score
        ),
        Err(e) => warn!("Failed to read proximity stats: {}", e),
    }

    summary
}
