//! Zoneval regional market statistics provider.
//!
//! Returns average, median and sample support of listing prices, per area
//! unit and per room, for a Brazilian postal code (CEP) and the neighbourhood,
//! city and state that contain it. Requires an API key and secret.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::models::{RegionalStatsGroup, RegionalStatsSet};
use crate::provider::MarketStatsProvider;

/// Provider ID constant
const PROVIDER_ID: &str = "ZONEVAL";

const DEFAULT_BASE_URL: &str = "https://api.zoneval.com";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Length of a normalized zipcode (Brazilian CEP).
pub const ZIPCODE_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
struct StatsResponse {
    by_zipcode: RegionalStatsGroup,
    by_neighbourhood: RegionalStatsGroup,
    by_city: RegionalStatsGroup,
    by_uf: RegionalStatsGroup,
}

impl From<StatsResponse> for RegionalStatsSet {
    fn from(response: StatsResponse) -> Self {
        Self {
            zipcode: response.by_zipcode,
            neighbourhood: response.by_neighbourhood,
            city: response.by_city,
            state: response.by_uf,
        }
    }
}

/// Zoneval statistics provider.
///
/// # Example
///
/// ```ignore
/// use estimo_market_data::provider::zoneval::ZonevalProvider;
///
/// let provider = ZonevalProvider::new(api_key, api_secret);
/// let stats = provider.fetch_stats("01310100").await?;
/// ```
pub struct ZonevalProvider {
    client: Client,
    api_key: String,
    api_secret: String,
    base_url: String,
}

impl ZonevalProvider {
    pub fn new(api_key: String, api_secret: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            api_secret,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn check_zipcode(zipcode: &str) -> Result<(), ProviderError> {
        if zipcode.len() == ZIPCODE_LENGTH && zipcode.bytes().all(|b| b.is_ascii_digit()) {
            Ok(())
        } else {
            Err(ProviderError::InvalidInput(format!(
                "zipcode must have {} digits, got '{}'",
                ZIPCODE_LENGTH, zipcode
            )))
        }
    }

    fn parse(body: &str) -> Result<RegionalStatsSet, ProviderError> {
        serde_json::from_str::<StatsResponse>(body)
            .map(RegionalStatsSet::from)
            .map_err(|e| ProviderError::malformed(PROVIDER_ID, e.to_string()))
    }
}

#[async_trait]
impl MarketStatsProvider for ZonevalProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.trim().is_empty()
    }

    async fn fetch_stats(&self, zipcode: &str) -> Result<RegionalStatsSet, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::NotConfigured {
                provider: PROVIDER_ID.to_string(),
            });
        }
        Self::check_zipcode(zipcode)?;

        let url = format!("{}/zipcodes/{}/stats", self.base_url, zipcode);
        debug!("Fetching Zoneval stats for {}", zipcode);

        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .header("x-api-secret", &self.api_secret)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER_ID, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::from_status(PROVIDER_ID, status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER_ID, e))?;

        Self::parse(&body)
    }
}
