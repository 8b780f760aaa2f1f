//! OpenStreetMap Nominatim reverse geocoding provider.
//!
//! Free and keyless, with good postal code coverage in Brazil, so it is the
//! first strategy in the default resolver chain. The public instance requires
//! an identifying `User-Agent` and allows roughly one request per second.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::models::{strip_non_digits, Coordinates, GeocodingSource, ResolvedLocation};
use crate::provider::ZipcodeResolver;

/// Provider ID constant
const PROVIDER_ID: &str = "NOMINATIM";

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

const USER_AGENT: &str = "EstimoValuation/1.0";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    address: Option<ReverseAddress>,
}

#[derive(Debug, Deserialize)]
struct ReverseAddress {
    postcode: Option<String>,
    suburb: Option<String>,
    neighbourhood: Option<String>,
    quarter: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
}

/// Nominatim reverse geocoder.
///
/// # Example
///
/// ```ignore
/// use estimo_market_data::provider::nominatim::NominatimProvider;
///
/// let provider = NominatimProvider::new().with_language("pt-BR");
/// ```
pub struct NominatimProvider {
    client: Client,
    base_url: String,
    language: String,
}

impl NominatimProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "pt-BR".to_string(),
        }
    }

    /// Point the provider at another Nominatim instance.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    fn into_location(response: ReverseResponse) -> Result<ResolvedLocation, ProviderError> {
        let address = response.address.ok_or_else(|| ProviderError::NotFound {
            provider: PROVIDER_ID.to_string(),
            message: "no address for coordinates".to_string(),
        })?;

        let zipcode = address
            .postcode
            .as_deref()
            .map(strip_non_digits)
            .filter(|zip| !zip.is_empty())
            .ok_or_else(|| ProviderError::NotFound {
                provider: PROVIDER_ID.to_string(),
                message: "address has no postcode".to_string(),
            })?;

        Ok(ResolvedLocation {
            zipcode,
            address: response.display_name,
            neighbourhood: address.suburb.or(address.neighbourhood).or(address.quarter),
            city: address.city.or(address.town).or(address.village),
            state: address.state,
            source: GeocodingSource::Nominatim,
        })
    }
}

impl Default for NominatimProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ZipcodeResolver for NominatimProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    async fn reverse_geocode(
        &self,
        coordinates: &Coordinates,
    ) -> Result<ResolvedLocation, ProviderError> {
        let url = format!("{}/reverse", self.base_url);
        let lat = coordinates.lat.to_string();
        let lng = coordinates.lng.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("lat", lat.as_str()),
                ("lon", lng.as_str()),
                ("zoom", "18"),
                ("addressdetails", "1"),
                ("accept-language", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER_ID, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(PROVIDER_ID, status));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(PROVIDER_ID, e.to_string()))?;

        Self::into_location(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderErrorKind;

    fn parse(json: &str) -> Result<ResolvedLocation, ProviderError> {
        let response: ReverseResponse = serde_json::from_str(json).unwrap();
        NominatimProvider::into_location(response)
    }

    #[test]
    fn test_full_address() {
        let location = parse(
            r#"{
                "display_name": "Avenida Paulista, Bela Vista, São Paulo, 01310-100, Brasil",
                "address": {
                    "road": "Avenida Paulista",
                    "suburb": "Bela Vista",
                    "city": "São Paulo",
                    "state": "São Paulo",
                    "postcode": "01310-100",
                    "country_code": "br"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(location.zipcode, "01310100");
        assert_eq!(location.neighbourhood.as_deref(), Some("Bela Vista"));
        assert_eq!(location.city.as_deref(), Some("São Paulo"));
        assert_eq!(location.source, GeocodingSource::Nominatim);
    }

    #[test]
    fn test_town_and_quarter_fallbacks() {
        let location = parse(
            r#"{
                "display_name": "Centro, Ubatuba",
                "address": {"quarter": "Centro", "town": "Ubatuba", "postcode": "11680000"}
            }"#,
        )
        .unwrap();

        assert_eq!(location.neighbourhood.as_deref(), Some("Centro"));
        assert_eq!(location.city.as_deref(), Some("Ubatuba"));
        assert_eq!(location.state, None);
    }

    #[test]
    fn test_missing_postcode_is_not_found() {
        let err = parse(r#"{"display_name": "Oceano", "address": {"state": "SP"}}"#).unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::NotFound);
    }

    #[test]
    fn test_unable_to_geocode_is_not_found() {
        let err = parse(r#"{"error": "Unable to geocode"}"#).unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::NotFound);
    }

    #[test]
    fn test_non_numeric_postcode_is_not_found() {
        let err = parse(r#"{"address": {"postcode": "N/A"}}"#).unwrap_err();
        assert_eq!(err.kind(), ProviderErrorKind::NotFound);
    }

    #[test]
    fn test_provider_priority() {
        let provider = NominatimProvider::new();
        assert_eq!(provider.id(), "NOMINATIM");
        assert_eq!(provider.priority(), 1);
        assert!(provider.is_configured());
    }
}
