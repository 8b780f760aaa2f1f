//! Per-category scoring table.

use estimo_market_data::LandmarkCategory;

/// Weight of a category without a profile.
pub const DEFAULT_CATEGORY_WEIGHT: f64 = 0.05;

/// Threshold of a category without a profile.
pub const DEFAULT_CATEGORY_THRESHOLD_METERS: f64 = 1000.0;

/// Name check applied to search results of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFilter {
    /// Accept only names that look like actual waterfront.
    Beach,
}

impl NameFilter {
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            Self::Beach => is_likely_beach(name),
        }
    }
}

/// Scoring parameters of one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryProfile {
    /// Relative weight in the overall score.
    pub weight: f64,
    /// Distance under which a landmark counts as close; scores reach zero here.
    pub threshold_meters: f64,
    pub name_filter: Option<NameFilter>,
}

const fn profile(weight: f64, threshold_meters: f64) -> CategoryProfile {
    CategoryProfile {
        weight,
        threshold_meters,
        name_filter: None,
    }
}

pub fn category_profile(category: LandmarkCategory) -> CategoryProfile {
    match category {
        LandmarkCategory::Beach => CategoryProfile {
            weight: 0.25,
            threshold_meters: 200.0,
            name_filter: Some(NameFilter::Beach),
        },
        LandmarkCategory::ShoppingMall => profile(0.15, 1500.0),
        LandmarkCategory::Hospital => profile(0.10, 200.0),
        LandmarkCategory::School => profile(0.15, 100.0),
        LandmarkCategory::Park => profile(0.10, 50.0),
        LandmarkCategory::Restaurant => profile(0.05, 1000.0),
        LandmarkCategory::Bank => profile(0.05, 1000.0),
        LandmarkCategory::Gym => profile(0.05, 500.0),
        LandmarkCategory::Pharmacy => profile(0.05, 500.0),
        LandmarkCategory::MetroStation => {
            profile(DEFAULT_CATEGORY_WEIGHT, DEFAULT_CATEGORY_THRESHOLD_METERS)
        }
    }
}

const BEACH_TOKENS: &[&str] = &[
    "beach", "praia", "playa", "plage", "strand", "shore", "coast", "costa", "marina", "bay",
    "baía", "cove", "creek", "lagoon", "lagoa",
];

const BEACH_FALSE_POSITIVES: &[&str] = &[
    "beach club",
    "beach house",
    "beach resort",
    "beach hotel",
    "beach bar",
    "beach restaurant",
    "beach cafe",
    "beach store",
    "beach shop",
    "beach volleyball",
    "beach tennis",
    "beach soccer",
    "beach party",
    "beach wedding",
    "beach event",
    "beach festival",
];

/// Whether a place name denotes a beach rather than a venue named after one.
///
/// # Examples
///
/// ```
/// use estimo_core::proximity::is_likely_beach;
///
/// assert!(is_likely_beach("Praia do Forte"));
/// assert!(!is_likely_beach("Beach Volleyball Club"));
/// ```
pub fn is_likely_beach(name: &str) -> bool {
    let name = name.to_lowercase();
    BEACH_TOKENS.iter().any(|token| name.contains(token))
        && !BEACH_FALSE_POSITIVES.iter().any(|p| name.contains(p))
}
