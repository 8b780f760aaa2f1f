//! Provider trait definitions.
//!
//! One trait per external capability. Callers depend on these traits only,
//! so new providers can be added without touching them.

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::{Coordinates, LandmarkCategory, PlaceResult, RegionalStatsSet, ResolvedLocation};

/// Reverse geocoding strategy that yields a postal code for a coordinate.
///
/// Implementations return `NotFound` when the provider answers without a
/// usable postal code, so the resolver chain can fall through.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use estimo_market_data::provider::ZipcodeResolver;
///
/// struct MyGeocoder;
///
/// #[async_trait]
/// impl ZipcodeResolver for MyGeocoder {
///     fn id(&self) -> &'static str {
///         "MY_GEOCODER"
///     }
///
///     async fn reverse_geocode(
///         &self,
///         coordinates: &Coordinates,
///     ) -> Result<ResolvedLocation, ProviderError> {
///         // ... call the remote service
///     }
/// }
/// ```
#[async_trait]
pub trait ZipcodeResolver: Send + Sync {
    /// Unique identifier for this provider, used for logging.
    fn id(&self) -> &'static str;

    /// Provider priority for ordering.
    ///
    /// Lower values = tried first. Default is 10.
    fn priority(&self) -> u8 {
        10
    }

    /// Whether the provider has the credentials it needs.
    fn is_configured(&self) -> bool {
        true
    }

    /// Resolve address components, including the postal code, for a point.
    async fn reverse_geocode(
        &self,
        coordinates: &Coordinates,
    ) -> Result<ResolvedLocation, ProviderError>;
}

/// Source of regional price statistics keyed by postal code.
#[async_trait]
pub trait MarketStatsProvider: Send + Sync {
    /// Unique identifier for this provider, used for logging.
    fn id(&self) -> &'static str;

    /// Whether the provider has the credentials it needs.
    fn is_configured(&self) -> bool {
        true
    }

    /// Fetch the four statistics groups for a normalized (digits only) zipcode.
    async fn fetch_stats(&self, zipcode: &str) -> Result<RegionalStatsSet, ProviderError>;
}

/// Nearby search over points of interest.
#[async_trait]
pub trait LandmarkSearchProvider: Send + Sync {
    /// Unique identifier for this provider, used for logging.
    fn id(&self) -> &'static str;

    /// Whether the provider has the credentials it needs.
    fn is_configured(&self) -> bool {
        true
    }

    /// Search places of one category around `center`.
    ///
    /// An empty list is a valid answer. Radius filtering on the provider side
    /// is approximate; callers should re-check distances.
    async fn nearby_search(
        &self,
        center: &Coordinates,
        radius_meters: f64,
        category: LandmarkCategory,
    ) -> Result<Vec<PlaceResult>, ProviderError>;
}
