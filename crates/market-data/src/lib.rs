//! Estimo Market Data Crate
//!
//! Provider-agnostic access to the external signals used by the valuation
//! pipeline: postal code lookup, regional price statistics and nearby
//! landmarks.
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   Domain Layer   | --> |   Coordinates    |
//! +------------------+     +------------------+
//!          |                        |
//!          |                        v
//!          |               +------------------+
//!          |               |   GeoResolver    |  (Nominatim -> Google)
//!          |               +------------------+
//!          |                        |
//!          v                        v
//! +------------------+     +------------------+
//! | Landmark search  |     |  Market stats    |  (Zoneval, by zipcode)
//! | (Google Places)  |     +------------------+
//! +------------------+
//! ```
//!
//! Every provider call returns `Result<_, ProviderError>`; the tagged
//! [`ProviderErrorKind`] tells callers whether a failure only concerns the
//! current request or the provider as a whole.
//!
//! # Core Types
//!
//! - [`Coordinates`] - WGS84 point
//! - [`ResolvedLocation`] - Postal code and address components
//! - [`RegionalStatsSet`] - Four granularities of price statistics
//! - [`PlaceResult`] - One nearby search hit
//! - [`LandmarkCategory`] - Amenity categories searched around a property

pub mod errors;
pub mod models;
pub mod provider;
pub mod resolver;

pub use errors::{ProviderError, ProviderErrorKind};

pub use models::{
    strip_non_digits, Coordinates, GeocodingSource, LandmarkCategory, PlaceResult, RegionalStats,
    RegionalStatsGroup, RegionalStatsSet, ResolvedLocation,
};

pub use resolver::GeoResolver;

pub use provider::google::{GoogleGeocodingProvider, GooglePlacesProvider};
pub use provider::nominatim::NominatimProvider;
pub use provider::zoneval::{ZonevalProvider, ZIPCODE_LENGTH};
pub use provider::{LandmarkSearchProvider, MarketStatsProvider, ZipcodeResolver};
