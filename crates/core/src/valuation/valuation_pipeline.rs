//! Valuation orchestrator.

use std::sync::Arc;

use async_trait::async_trait;
use estimo_market_data::{GeoResolver, ResolvedLocation};
use log::{debug, info, warn};
use rust_decimal::Decimal;

use super::aggregator::{average_precision, RobustPriceAggregator};
use super::valuation_model::{ComparableCriteria, ComparableQuery, PropertyAttributes, ValuationResult};
use super::valuation_traits::{ComparableRetrievalTrait, ValuationServiceTrait};
use crate::errors::Result;
use crate::market_calibration::{normalize_zipcode, MarketCalibrationServiceTrait};
use crate::proximity::{ProximityRequest, ProximityScorerTrait};
use crate::settings::{ProximitySettings, ValuationSettings};

/// Sequences zipcode resolution, market calibration, comparable retrieval,
/// aggregation, refinement and proximity scoring.
///
/// Only a failing comparable retrieval fails the valuation. Every other stage
/// degrades to an absent enrichment.
pub struct ValuationPipeline {
    geo_resolver: Arc<GeoResolver>,
    calibration: Arc<dyn MarketCalibrationServiceTrait>,
    comparables: Arc<dyn ComparableRetrievalTrait>,
    proximity: Option<Arc<dyn ProximityScorerTrait>>,
    settings: ValuationSettings,
    proximity_settings: ProximitySettings,
}

impl ValuationPipeline {
    pub fn new(
        geo_resolver: Arc<GeoResolver>,
        calibration: Arc<dyn MarketCalibrationServiceTrait>,
        comparables: Arc<dyn ComparableRetrievalTrait>,
        proximity: Option<Arc<dyn ProximityScorerTrait>>,
        settings: ValuationSettings,
        proximity_settings: ProximitySettings,
    ) -> Self {
        Self {
            geo_resolver,
            calibration,
            comparables,
            proximity,
            settings,
            proximity_settings,
        }
    }

    /// Caller-supplied zipcode when valid, otherwise reverse geocoding.
    async fn resolve_zipcode(
        &self,
        attributes: &PropertyAttributes,
    ) -> (Option<String>, Option<ResolvedLocation>) {
        if let Some(raw) = attributes.zipcode.as_deref() {
            match normalize_zipcode(raw) {
                Ok(zipcode) => return (Some(zipcode), None),
                Err(e) => warn!("Ignoring provided zipcode: {}", e),
            }
        }

        match self.geo_resolver.resolve(&attributes.coordinates).await {
            Some(location) => match normalize_zipcode(&location.zipcode) {
                Ok(zipcode) => (Some(zipcode), Some(location)),
                Err(e) => {
                    warn!("Geocoded zipcode unusable for calibration: {}", e);
                    (None, Some(location))
                }
            },
            None => (None, None),
        }
    }

    fn comparable_query(
        &self,
        attributes: &PropertyAttributes,
        regional_price_per_area: Option<Decimal>,
    ) -> ComparableQuery {
        ComparableQuery {
            criteria: ComparableCriteria::from(attributes),
            tolerances: self.settings.tolerances,
            radius_km: self.settings.search_radius_km,
            match_count: self.settings.match_count,
            regional_price_per_area,
            max_price_deviation: regional_price_per_area.and(self.settings.max_price_deviation),
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationPipeline {
    async fn evaluate(&self, attributes: &PropertyAttributes) -> Result<ValuationResult> {
        let (zipcode, location) = self.resolve_zipcode(attributes).await;

        let stats = match zipcode.as_deref() {
            Some(zip) => self.calibration.lookup_stats(zip).await,
            None => {
                info!("Proceeding without market calibration: no zipcode");
                None
            }
        };
        let regional_price_per_area = stats
            .map(|s| s.zipcode_price_per_area_median())
            .filter(|median| *median > Decimal::ZERO);

        let query = self.comparable_query(attributes, regional_price_per_area);
        let comparables = self.comparables.find(&query).await?;
        info!("Comparables found: {}", comparables.len());

        let prices: Vec<Decimal> = comparables.iter().map(|c| c.price).collect();
        let summary = RobustPriceAggregator::aggregate(&prices);
        let scores: Vec<f64> = comparables.iter().filter_map(|c| c.similarity_score).collect();
        let avg_precision = average_precision(&scores);

        let outcome = match (&stats, comparables.is_empty()) {
            (Some(stats), false) => Some(self.calibration.validate_with_stats(
                stats,
                summary.trimmed_mean,
                attributes.area,
            )),
            (_, true) => {
                debug!("No comparables, skipping market validation");
                None
            }
            (None, false) => None,
        };

        let proximity_analysis = match &self.proximity {
            Some(scorer) => Some(
                scorer
                    .analyze(&ProximityRequest {
                        coordinates: attributes.coordinates,
                        radius_meters: self.proximity_settings.radius_meters,
                        categories: self.proximity_settings.categories.clone(),
                        max_results_per_category: self.proximity_settings.max_results_per_category,
                    })
                    .await,
            ),
            None => None,
        };

        let (market_validation, market_insight, refined_price) = match outcome {
            Some(outcome) if outcome.validation.is_some() => (
                outcome.validation,
                outcome.insight,
                Some(outcome.refined_price),
            ),
            _ => (None, None, None),
        };

        Ok(ValuationResult {
            estimated_price: summary.trimmed_mean,
            median_price: summary.median,
            avg_price: summary.mean,
            refined_price,
            avg_precision,
            comparables,
            zipcode,
            location,
            market_validation,
            market_insight,
            proximity_analysis,
        })
    }
}
