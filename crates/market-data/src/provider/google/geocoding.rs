//! Google Geocoding API reverse geocoder.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{check_status, GoogleStatus, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
use crate::errors::ProviderError;
use crate::models::{strip_non_digits, Coordinates, GeocodingSource, ResolvedLocation};
use crate::provider::ZipcodeResolver;

/// Provider ID constant
const PROVIDER_ID: &str = "GOOGLE_GEOCODING";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    short_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl AddressComponent {
    fn has_type(&self, wanted: &str) -> bool {
        self.types.iter().any(|t| t == wanted)
    }
}

/// Google reverse geocoder. Requires an API key.
pub struct GoogleGeocodingProvider {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
    region: String,
}

impl GoogleGeocodingProvider {
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
            region: "br".to_string(),
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

    /// Region bias (ccTLD code) applied to results.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    fn into_location(response: GeocodeResponse) -> Result<ResolvedLocation, ProviderError> {
        let not_found = || ProviderError::NotFound {
            provider: PROVIDER_ID.to_string(),
            message: "no postal code for coordinates".to_string(),
        };

        match check_status(PROVIDER_ID, &response.status, response.error_message.as_deref())? {
            GoogleStatus::ZeroResults => return Err(not_found()),
            GoogleStatus::Ok => {}
        }

        let result = response.results.into_iter().next().ok_or_else(not_found)?;
        let components = &result.address_components;

        let zipcode = components
            .iter()
            .find(|c| c.has_type("postal_code"))
            .map(|c| strip_non_digits(&c.long_name))
            .filter(|zip| !zip.is_empty())
            .ok_or_else(not_found)?;

        let neighbourhood = components
            .iter()
            .find(|c| c.has_type("sublocality") || c.has_type("sublocality_level_1"))
            .map(|c| c.long_name.clone());
        let city = components
            .iter()
            .find(|c| c.has_type("locality") || c.has_type("administrative_area_level_2"))
            .map(|c| c.long_name.clone());
        let state = components
            .iter()
            .find(|c| c.has_type("administrative_area_level_1"))
            .map(|c| c.short_name.clone());

        Ok(ResolvedLocation {
            zipcode,
            address: result.formatted_address,
            neighbourhood,
            city,
            state,
            source: GeocodingSource::Google,
        })
    }
}

#[async_trait]
impl ZipcodeResolver for GoogleGeocodingProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn reverse_geocode(
        &self,
        coordinates: &Coordinates,
    ) -> Result<ResolvedLocation, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let url = format!("{}/geocode/json", self.base_url);
        let latlng = format!("{},{}", coordinates.lat, coordinates.lng);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latlng", latlng.as_str()),
                ("key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("region", self.region.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER_ID, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(PROVIDER_ID, status));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(PROVIDER_ID, e.to_string()))?;

        Self::into_location(body)
    }
}
