//! Proximity search with tag filtering.

use crate::error::Result;

use super::index::GeoIndex;
use super::types::{Coordinates, ProximityMatch, TagFilter};

/// Combines radius queries with an optional instrument/genre filter.
#[derive(Clone)]
pub struct ProfileSearch {
    index: GeoIndex,
}

impl ProfileSearch {
    /// Creates a new search over the given index.
    #[must_use]
    pub const fn new(index: GeoIndex) -> Self {
        Self { index }
    }

    /// Returns users within `radius_km` of `center` that pass the filter,
    /// each annotated with a 2-decimal distance. Results are not sorted by
    /// distance.
    ///
    /// Filter semantics are OR across dimensions: supplying both
    /// instruments and genres matches candidates that intersect either
    /// set. An absent or empty filter matches every candidate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a malformed center or non-positive
    /// radius.
    pub async fn search(
        &self,
        center: Coordinates,
        radius_km: f64,
        filter: Option<&TagFilter>,
    ) -> Result<Vec<ProximityMatch>> {
        let candidates = self.index.query(center, radius_km).await?;

        let matches: Vec<ProximityMatch> = candidates
            .into_iter()
            .filter(|c| filter.is_none_or(|f| f.matches(&c.tags)))
            .map(|c| ProximityMatch {
                user_id: c.user_id,
                distance_km: c.distance_km,
            })
            .collect();

        tracing::debug!(
            radius_km,
            filtered = matches.len(),
            "profile search completed"
        );
        Ok(matches)
    }
}
