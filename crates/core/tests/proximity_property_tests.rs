//! Property-based tests for distance and proximity scoring.

use estimo_core::proximity::{cache_key, haversine_distance, ProximityScorer};
use estimo_market_data::{Coordinates, LandmarkCategory};
use proptest::prelude::*;

fn arb_coordinates() -> impl Strategy<Value = Coordinates> {
    (-60.0f64..60.0, -170.0f64..170.0).prop_map(|(lat, lng)| Coordinates::new(lat, lng))
}

fn arb_category() -> impl Strategy<Value = LandmarkCategory> {
    prop::sample::select(LandmarkCategory::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_haversine_symmetric(a in arb_coordinates(), b in arb_coordinates()) {
        let ab = haversine_distance(&a, &b);
        let ba = haversine_distance(&b, &a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn prop_haversine_zero_at_same_point(a in arb_coordinates()) {
        prop_assert!(haversine_distance(&a, &a).abs() < 1e-9);
    }

    /// Scores never increase as the landmark gets farther away.
    #[test]
    fn prop_landmark_score_monotone(
        category in arb_category(),
        near in 0.0f64..5_000.0,
        extra in 0.0f64..5_000.0,
    ) {
        let close = ProximityScorer::landmark_score(near, category);
        let far = ProximityScorer::landmark_score(near + extra, category);
        prop_assert!(close <= 100);
        prop_assert!(far <= close);
    }

    /// Category order and duplicates do not change the cache key.
    #[test]
    fn prop_cache_key_canonical(
        center in arb_coordinates(),
        mut categories in prop::collection::vec(arb_category(), 1..8),
    ) {
        let key = cache_key(&center, 1000.0, &categories);
        categories.reverse();
        categories.push(categories[0]);
        prop_assert_eq!(key, cache_key(&center, 1000.0, &categories));
    }
}
