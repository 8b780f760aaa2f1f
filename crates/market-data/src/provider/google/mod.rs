//! Google Maps Platform providers.
//!
//! - [`GoogleGeocodingProvider`]: reverse geocoding (paid, precise)
//! - [`GooglePlacesProvider`]: nearby landmark search
//!
//! Both APIs answer HTTP 200 with a `status` field describing the outcome,
//! which is mapped to [`ProviderError`] by [`check_status`].

mod geocoding;
mod places;

pub use geocoding::GoogleGeocodingProvider;
pub use places::GooglePlacesProvider;

use std::time::Duration;

use crate::errors::ProviderError;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Outcome of a Google API call that returned no usable results.
pub(crate) enum GoogleStatus {
    Ok,
    ZeroResults,
}

/// Maps the `status` field shared by the Geocoding and Places APIs.
pub(crate) fn check_status(
    provider: &str,
    status: &str,
    error_message: Option<&str>,
) -> Result<GoogleStatus, ProviderError> {
    let detail = || error_message.unwrap_or(status).to_string();
    match status {
        "OK" => Ok(GoogleStatus::Ok),
        "ZERO_RESULTS" => Ok(GoogleStatus::ZeroResults),
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Err(ProviderError::RateLimited {
            provider: provider.to_string(),
        }),
        "REQUEST_DENIED" => Err(ProviderError::Unauthorized {
            provider: provider.to_string(),
        }),
        "INVALID_REQUEST" => Err(ProviderError::InvalidInput(detail())),
        _ => Err(ProviderError::ProviderError {
            provider: provider.to_string(),
            message: detail(),
        }),
    }
}
