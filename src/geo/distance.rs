//! Great-circle distance and coarse cell encoding.

use super::types::Coordinates;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geohash length written with every geo entry (±2.4 km cells).
///
/// The cell exists so an index-backed store can prefilter by range scan.
/// Exact filtering always happens on the haversine distance.
pub const CELL_PRECISION: usize = 5;

/// Computes the great-circle distance between two points via the
/// haversine formula, in kilometers.
#[must_use]
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Rounds a distance to two decimal places for presentation.
#[must_use]
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

/// Encodes the coarse geohash cell for a coordinate pair.
///
/// Returns an empty string if encoding fails, which only happens for
/// out-of-range input that validation already rejects upstream.
#[must_use]
pub fn cell_for(coordinates: &Coordinates) -> String {
    geohash::encode(
        geohash::Coord {
            x: coordinates.longitude,
            y: coordinates.latitude,
        },
        CELL_PRECISION,
    )
    .unwrap_or_else(|_| String::new())
}
