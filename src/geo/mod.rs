//! Geospatial search for Bandmate.
//!
//! Maintains one geocoded entry per user and answers radius queries with
//! haversine distances and optional instrument/genre tag filtering.
//!
//! # Correctness model
//!
//! The document store's proximity primitive may use a coarse spatial index
//! (the geohash cell written with every entry) to gather candidates; it is
//! an optimization only. [`GeoIndex::query`] always rechecks candidates
//! against the exact great-circle distance and discards anything strictly
//! farther than the requested radius.
//!
//! # Types
//!
//! - [`Coordinates`]: validated WGS84 position
//! - [`GeoEntry`]: one geocoded record per user
//! - [`TagFilter`]: instrument/genre filter with OR-across-dimensions
//!   matching
//! - [`ProximityMatch`]: a search hit with its rounded distance

pub mod distance;
mod index;
mod search;
pub mod types;

pub use distance::{haversine_km, round_km, EARTH_RADIUS_KM};
pub use index::GeoIndex;
pub use search::ProfileSearch;
pub use types::{Coordinates, GeoCandidate, GeoEntry, ProfileTags, ProximityMatch, TagFilter};
