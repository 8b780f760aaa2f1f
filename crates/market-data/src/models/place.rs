use serde::{Deserialize, Serialize};

use super::coordinates::Coordinates;

/// Amenity category searched around a property.
///
/// The declaration order is the canonical order used for cache keys and for
/// merging search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkCategory {
    Beach,
    MetroStation,
    ShoppingMall,
    Hospital,
    School,
    Park,
    Restaurant,
    Bank,
    Gym,
    Pharmacy,
}

impl LandmarkCategory {
    pub const ALL: [LandmarkCategory; 10] = [
        Self::Beach,
        Self::MetroStation,
        Self::ShoppingMall,
        Self::Hospital,
        Self::School,
        Self::Park,
        Self::Restaurant,
        Self::Bank,
        Self::Gym,
        Self::Pharmacy,
    ];

    /// Stable identifier used in cache keys and persisted snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beach => "beach",
            Self::MetroStation => "metro_station",
            Self::ShoppingMall => "shopping_mall",
            Self::Hospital => "hospital",
            Self::School => "school",
            Self::Park => "park",
            Self::Restaurant => "restaurant",
            Self::Bank => "bank",
            Self::Gym => "gym",
            Self::Pharmacy => "pharmacy",
        }
    }

    /// Free-text keyword sent to the landmark search provider.
    pub fn search_keyword(&self) -> &'static str {
        match self {
            Self::Beach => "beach",
            Self::MetroStation => "metro station",
            Self::ShoppingMall => "shopping mall",
            Self::Hospital => "hospital",
            Self::School => "school",
            Self::Park => "park",
            Self::Restaurant => "restaurant",
            Self::Bank => "bank",
            Self::Gym => "gym",
            Self::Pharmacy => "pharmacy",
        }
    }
}

/// A single place returned by a nearby search.
///
/// Providers report their own notion of relevance; distance is recomputed by
/// the caller from `coordinates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    pub rating: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_sorted() {
        let mut sorted = LandmarkCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, LandmarkCategory::ALL);
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for category in LandmarkCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
