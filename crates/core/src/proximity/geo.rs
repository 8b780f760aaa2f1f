use estimo_market_data::Coordinates;

use crate::constants::EARTH_RADIUS_METERS;

/// Great-circle distance in meters.
///
/// # Examples
///
/// ```
/// use estimo_core::proximity::haversine_distance;
/// use estimo_market_data::Coordinates;
///
/// let p = Coordinates::new(-22.9711, -43.1822);
/// assert!(haversine_distance(&p, &p) < 1e-9);
/// ```
pub fn haversine_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}
