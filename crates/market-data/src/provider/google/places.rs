//! Google Places nearby search.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use super::{check_status, GoogleStatus, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
use crate::errors::ProviderError;
use crate::models::{Coordinates, LandmarkCategory, PlaceResult};
use crate::provider::LandmarkSearchProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "GOOGLE_PLACES";

/// Largest radius accepted by the nearby search endpoint.
const MAX_RADIUS_METERS: f64 = 50_000.0;

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyPlace>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NearbyPlace {
    place_id: String,
    #[serde(default)]
    name: String,
    geometry: Geometry,
    rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Google Places nearby search provider. Requires an API key.
pub struct GooglePlacesProvider {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl GooglePlacesProvider {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "pt-BR".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    fn into_places(response: NearbyResponse) -> Result<Vec<PlaceResult>, ProviderError> {
        match check_status(PROVIDER_ID, &response.status, response.error_message.as_deref())? {
            GoogleStatus::ZeroResults => Ok(Vec::new()),
            GoogleStatus::Ok => Ok(response
                .results
                .into_iter()
                .map(|place| PlaceResult {
                    id: place.place_id,
                    name: place.name,
                    coordinates: Coordinates::new(
                        place.geometry.location.lat,
                        place.geometry.location.lng,
                    ),
                    rating: place.rating,
                })
                .collect()),
        }
    }
}

#[async_trait]
impl LandmarkSearchProvider for GooglePlacesProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn nearby_search(
        &self,
        center: &Coordinates,
        radius_meters: f64,
        category: LandmarkCategory,
    ) -> Result<Vec<PlaceResult>, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !(radius_meters > 0.0) {
            return Err(ProviderError::InvalidInput(format!(
                "search radius must be positive, got {}",
                radius_meters
            )));
        }

        let url = format!("{}/place/nearbysearch/json", self.base_url);
        let location = format!("{},{}", center.lat, center.lng);
        let radius = radius_meters.min(MAX_RADIUS_METERS).round().to_string();

        debug!(
            "Nearby search for '{}' around {} within {}m",
            category.search_keyword(),
            location,
            radius
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("keyword", category.search_keyword()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER_ID, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(PROVIDER_ID, status));
        }

        let body: NearbyResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(PROVIDER_ID, e.to_string()))?;

        Self::into_places(body)
    }
}
