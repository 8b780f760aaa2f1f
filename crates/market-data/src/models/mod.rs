//! Market data models
//!
//! This module contains the provider-agnostic data types exchanged with the
//! external collaborators:
//! - `coordinates` - WGS84 coordinates (Coordinates)
//! - `location` - Reverse geocoding results (ResolvedLocation, GeocodingSource)
//! - `regional_stats` - Regional price statistics (RegionalStats, RegionalStatsGroup, RegionalStatsSet)
//! - `place` - Landmark categories and nearby search results (LandmarkCategory, PlaceResult)

mod coordinates;
mod location;
mod place;
mod regional_stats;

pub use coordinates::Coordinates;
pub use location::{strip_non_digits, GeocodingSource, ResolvedLocation};
pub use place::{LandmarkCategory, PlaceResult};
pub use regional_stats::{RegionalStats, RegionalStatsGroup, RegionalStatsSet};
