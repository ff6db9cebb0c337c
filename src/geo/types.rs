//! Geospatial data types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::store::Document;

/// A pair of WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, -90.0 to 90.0.
    pub latitude: f64,
    /// Longitude in degrees, -180.0 to 180.0.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a new coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validates that both components are finite and in range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for NaN, infinite, or out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoreError::InvalidArgument(format!(
                "latitude out of range: {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoreError::InvalidArgument(format!(
                "longitude out of range: {}",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Instrument and genre labels attached to a geo entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileTags {
    /// Instruments the user plays.
    #[serde(default)]
    pub instruments: BTreeSet<String>,
    /// Genres the user is interested in.
    #[serde(default)]
    pub genres: BTreeSet<String>,
}

impl ProfileTags {
    /// Creates an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instrument.
    #[must_use]
    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instruments.insert(instrument.into());
        self
    }

    /// Adds a genre.
    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genres.insert(genre.into());
        self
    }
}

/// Optional tag filter for a proximity search.
///
/// Matching is OR across the two dimensions: a candidate passes when its
/// instruments intersect the filter's instruments, or its genres intersect
/// the filter's genres. A filter with both dimensions empty matches every
/// candidate. The cross-dimension OR is deliberate, see [`matches`].
///
/// [`matches`]: TagFilter::matches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    /// Instruments to match against.
    pub instruments: BTreeSet<String>,
    /// Genres to match against.
    pub genres: BTreeSet<String>,
}

impl TagFilter {
    /// Creates an empty filter (matches everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instrument to the filter.
    #[must_use]
    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instruments.insert(instrument.into());
        self
    }

    /// Adds a genre to the filter.
    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genres.insert(genre.into());
        self
    }

    /// Returns whether the filter constrains nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty() && self.genres.is_empty()
    }

    /// Applies the filter to a candidate's tags.
    ///
    /// A candidate with `genres=["jazz"]` and no instruments matches a
    /// filter of `instruments=["guitar"], genres=["jazz"]`: intersecting
    /// either dimension is enough.
    #[must_use]
    pub fn matches(&self, tags: &ProfileTags) -> bool {
        if self.is_empty() {
            return true;
        }
        let instruments_overlap = self
            .instruments
            .iter()
            .any(|i| tags.instruments.contains(i));
        let genres_overlap = self.genres.iter().any(|g| tags.genres.contains(g));
        instruments_overlap || genres_overlap
    }
}

/// A geocoded entry for one user: coordinates plus searchable tags.
///
/// One entry exists per profile, replaced in full on every upsert. There is
/// no independent deletion path; entries live and die with their profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoEntry {
    /// The owning user's id.
    pub user_id: String,
    /// Last known coordinates.
    pub coordinates: Coordinates,
    /// Instrument and genre labels.
    #[serde(default)]
    pub tags: ProfileTags,
}

impl GeoEntry {
    /// Maps the entry to its stored fields, adding the coarse geohash cell
    /// used by index-backed proximity scans.
    pub(crate) fn to_document(&self) -> Result<Document> {
        let value = serde_json::to_value(self)
            .map_err(|e| CoreError::Store(format!("Failed to encode geo entry: {e}")))?;
        let Value::Object(mut fields) = value else {
            return Err(CoreError::Store("Geo entry did not encode to an object".to_string()));
        };
        fields.insert(
            "geohash".to_string(),
            Value::String(super::distance::cell_for(&self.coordinates)),
        );
        Ok(fields)
    }

    /// Maps stored fields back to an entry. Unknown fields (the geohash
    /// cell) are ignored.
    pub(crate) fn from_document(fields: Document) -> Result<Self> {
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| CoreError::Store(format!("Malformed geo entry: {e}")))
    }
}

/// A search candidate before tag filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoCandidate {
    /// The matched user's id.
    pub user_id: String,
    /// Tags for filter evaluation.
    pub tags: ProfileTags,
    /// Great-circle distance from the query center, rounded to 2 decimals.
    pub distance_km: f64,
}

/// A proximity search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityMatch {
    /// The matched user's id.
    pub user_id: String,
    /// Great-circle distance from the query center in kilometers, rounded
    /// to 2 decimals.
    pub distance_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_validate_accepts_boundaries() {
        assert!(Coordinates::new(90.0, 0.0).validate().is_ok());
        assert!(Coordinates::new(-90.0, 0.0).validate().is_ok());
        assert!(Coordinates::new(0.0, 180.0).validate().is_ok());
        assert!(Coordinates::new(0.0, -180.0).validate().is_ok());
    }

    #[test]
    fn coordinates_validate_rejects_out_of_range() {
        assert!(Coordinates::new(91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(-91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, 181.0).validate().is_err());
        assert!(Coordinates::new(0.0, -181.0).validate().is_err());
    }

    #[test]
    fn coordinates_validate_rejects_non_finite() {
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).validate().is_err());
        assert!(Coordinates::new(f64::NEG_INFINITY, 0.0).validate().is_err());
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TagFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&ProfileTags::new()));
        assert!(filter.matches(&ProfileTags::new().with_instrument("drums")));
    }

    #[test]
    fn filter_matches_on_instrument_intersection() {
        let filter = TagFilter::new().with_instrument("guitar");
        let tags = ProfileTags::new()
            .with_instrument("guitar")
            .with_instrument("bass");
        assert!(filter.matches(&tags));
    }

    #[test]
    fn filter_matches_across_dimensions() {
        // Cross-dimension OR: a genre hit satisfies a filter that also
        // names instruments.
        let filter = TagFilter::new().with_instrument("guitar").with_genre("jazz");
        let tags = ProfileTags::new().with_genre("jazz");
        assert!(filter.matches(&tags));
    }

    #[test]
    fn filter_rejects_disjoint_tags() {
        let filter = TagFilter::new().with_instrument("guitar").with_genre("jazz");
        let tags = ProfileTags::new()
            .with_instrument("drums")
            .with_genre("metal");
        assert!(!filter.matches(&tags));
    }

    #[test]
    fn filter_with_one_dimension_ignores_the_other() {
        let filter = TagFilter::new().with_genre("folk");
        let tags = ProfileTags::new().with_instrument("banjo");
        assert!(!filter.matches(&tags));
    }

    #[test]
    fn geo_entry_document_roundtrip() {
        let entry = GeoEntry {
            user_id: "user-1".to_string(),
            coordinates: Coordinates::new(37.7749, -122.4194),
            tags: ProfileTags::new().with_instrument("guitar").with_genre("jazz"),
        };

        let doc = entry.to_document().unwrap();
        assert!(doc.contains_key("geohash"));

        let recovered = GeoEntry::from_document(doc).unwrap();
        assert_eq!(recovered, entry);
    }

    #[test]
    fn geo_entry_from_document_rejects_garbage() {
        let mut fields = Document::new();
        fields.insert("user_id".to_string(), serde_json::json!(42));
        assert!(GeoEntry::from_document(fields).is_err());
    }
}
