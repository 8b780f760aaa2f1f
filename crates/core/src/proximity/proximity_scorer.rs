//! Landmark proximity scoring.

use std::sync::Arc;

use async_trait::async_trait;
use estimo_market_data::{
    Coordinates, LandmarkCategory, LandmarkSearchProvider, PlaceResult, ProviderError,
    ProviderErrorKind,
};
use log::{debug, info, warn};

use super::categories::category_profile;
use super::geo::haversine_distance;
use super::proximity_cache::{cache_key, ProximityCache};
use super::proximity_model::{Landmark, ProximityRequest, ProximityResult};
use super::proximity_traits::ProximityScorerTrait;
use crate::constants::ACCESS_SCORE_BAR;

/// Scores the landmarks around a point.
///
/// Categories are searched one after another in canonical category order, so
/// the landmark list and the overall score do not depend on the order in
/// which the caller listed them. Results are cached per grid cell, radius and
/// category set.
pub struct ProximityScorer {
    provider: Option<Arc<dyn LandmarkSearchProvider>>,
    cache: Arc<ProximityCache>,
}

impl ProximityScorer {
    pub fn new(provider: Option<Arc<dyn LandmarkSearchProvider>>, cache: Arc<ProximityCache>) -> Self {
        Self { provider, cache }
    }

    pub fn cache(&self) -> &ProximityCache {
        &self.cache
    }

    /// `max(0, 100 - distance / threshold * 100)`, rounded.
    pub fn landmark_score(distance_meters: f64, category: LandmarkCategory) -> u8 {
        let threshold = category_profile(category).threshold_meters;
        (100.0 - distance_meters / threshold * 100.0)
            .max(0.0)
            .round() as u8
    }

    /// Weighted average of landmark scores, normalized by the weights used.
    pub fn overall_score(landmarks: &[Landmark]) -> u8 {
        let (weighted, total_weight) = landmarks.iter().fold((0.0, 0.0), |(sum, weights), l| {
            let weight = category_profile(l.category).weight;
            (sum + f64::from(l.proximity_score) * weight, weights + weight)
        });
        if total_weight > 0.0 {
            (weighted / total_weight).round().clamp(0.0, 100.0) as u8
        } else {
            0
        }
    }

    /// A category is accessible when one of its landmarks lies within the
    /// category threshold with a score above the access bar.
    pub fn has_access(landmarks: &[Landmark], category: LandmarkCategory) -> bool {
        let threshold = category_profile(category).threshold_meters;
        landmarks.iter().any(|l| {
            l.category == category
                && l.distance_meters <= threshold
                && l.proximity_score > ACCESS_SCORE_BAR
        })
    }

    fn select_landmarks(
        center: &Coordinates,
        radius_meters: f64,
        category: LandmarkCategory,
        max_results: usize,
        places: Vec<PlaceResult>,
    ) -> Vec<Landmark> {
        let profile = category_profile(category);
        let mut landmarks = Vec::new();

        for place in places {
            if landmarks.len() >= max_results {
                break;
            }

            let distance = haversine_distance(center, &place.coordinates);
            if distance > radius_meters {
                debug!(
                    "Skipping {} - distance {:.0}m exceeds radius {}m",
                    place.name, distance, radius_meters
                );
                continue;
            }

            if let Some(filter) = profile.name_filter {
                if !filter.accepts(&place.name) {
                    debug!("Skipping {} - rejected by {:?} name filter", place.name, filter);
                    continue;
                }
            }

            landmarks.push(Landmark {
                id: place.id,
                name: place.name,
                coordinates: place.coordinates,
                category,
                rating: place.rating,
                distance_meters: distance,
                proximity_score: Self::landmark_score(distance, category),
            });
        }

        landmarks
    }

    /// Whether a failed category search only voids that category.
    fn skips_category(kind: ProviderErrorKind) -> bool {
        kind.is_request_scoped()
            || matches!(kind, ProviderErrorKind::Upstream | ProviderErrorKind::Malformed)
    }

    fn build_result(landmarks: Vec<Landmark>) -> ProximityResult {
        ProximityResult {
            overall_proximity_score: Self::overall_score(&landmarks),
            has_beach_access: Self::has_access(&landmarks, LandmarkCategory::Beach),
            has_metro_access: Self::has_access(&landmarks, LandmarkCategory::MetroStation),
            has_shopping_access: Self::has_access(&landmarks, LandmarkCategory::ShoppingMall),
            has_hospital_access: Self::has_access(&landmarks, LandmarkCategory::Hospital),
            has_school_access: Self::has_access(&landmarks, LandmarkCategory::School),
            has_park_access: Self::has_access(&landmarks, LandmarkCategory::Park),
            landmarks,
            cache_hit: false,
        }
    }
}

#[async_trait]
impl ProximityScorerTrait for ProximityScorer {
    async fn try_analyze(
        &self,
        request: &ProximityRequest,
    ) -> Result<ProximityResult, ProviderError> {
        let key = cache_key(&request.coordinates, request.radius_meters, &request.categories);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Location proximity cache hit for {}", key);
            return Ok(ProximityResult {
                cache_hit: true,
                ..cached
            });
        }

        let provider = match &self.provider {
            Some(p) if p.is_configured() => p,
            Some(p) => {
                return Err(ProviderError::NotConfigured {
                    provider: p.id().to_string(),
                })
            }
            None => {
                return Err(ProviderError::NotConfigured {
                    provider: "landmark search".to_string(),
                })
            }
        };

        if !(request.radius_meters > 0.0) {
            return Err(ProviderError::InvalidInput(format!(
                "search radius must be positive, got {}",
                request.radius_meters
            )));
        }

        let mut categories = request.categories.clone();
        categories.sort();
        categories.dedup();

        debug!(
            "Analyzing proximity around {}, {} within {}m",
            request.coordinates.lat, request.coordinates.lng, request.radius_meters
        );

        let mut landmarks = Vec::new();
        for category in categories {
            let places = match provider
                .nearby_search(&request.coordinates, request.radius_meters, category)
                .await
            {
                Ok(places) => places,
                Err(e) if Self::skips_category(e.kind()) => {
                    warn!("Skipping {} landmarks: {}", category.as_str(), e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let selected = Self::select_landmarks(
                &request.coordinates,
                request.radius_meters,
                category,
                request.max_results_per_category,
                places,
            );
            debug!(
                "Found {} valid {} landmarks within {}m",
                selected.len(),
                category.as_str(),
                request.radius_meters
            );
            landmarks.extend(selected);
        }

        let result = Self::build_result(landmarks);
        info!(
            "Proximity analysis complete: {} landmarks, overall score {}",
            result.landmarks.len(),
            result.overall_proximity_score
        );

        self.cache.insert(key, result.clone());
        Ok(result)
    }
}
