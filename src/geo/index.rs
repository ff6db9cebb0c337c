//! Geocoded entry index and radius queries.

use std::sync::Arc;

use crate::error::{CoreError, Result};
use crate::store::DocumentStore;

use super::distance::{haversine_km, round_km};
use super::types::{Coordinates, GeoCandidate, GeoEntry, ProfileTags};

/// Collection holding one geocoded entry per user.
const COLLECTION: &str = "geo_index";

/// Maintains a queryable geocoded entry per user and answers radius
/// queries annotated with distance.
///
/// The store's proximity primitive is treated as a coarse candidate
/// source. Every candidate is rechecked against the exact haversine
/// distance, so a wider-than-asked index scan never leaks into results.
#[derive(Clone)]
pub struct GeoIndex {
    store: Arc<dyn DocumentStore>,
}

impl GeoIndex {
    /// Creates a new index over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Idempotently replaces a user's geo entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for malformed coordinates.
    pub async fn upsert(
        &self,
        user_id: &str,
        coordinates: Coordinates,
        tags: ProfileTags,
    ) -> Result<()> {
        coordinates.validate()?;

        let entry = GeoEntry {
            user_id: user_id.to_string(),
            coordinates,
            tags,
        };
        let fields = entry.to_document()?;
        self.store.set_document(COLLECTION, user_id, fields).await?;

        tracing::debug!(user_id, "geo entry upserted");
        Ok(())
    }

    /// Returns every entry within `radius_km` of `center`, with tags and
    /// a 2-decimal distance. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a malformed center or non-positive
    /// radius.
    pub async fn query(&self, center: Coordinates, radius_km: f64) -> Result<Vec<GeoCandidate>> {
        center.validate()?;
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "radius must be positive: {radius_km}"
            )));
        }

        let docs = self
            .store
            .query_near(COLLECTION, center.latitude, center.longitude, radius_km)
            .await?;

        let mut candidates = Vec::with_capacity(docs.len());
        for doc in docs {
            let entry = GeoEntry::from_document(doc.fields)?;
            // The index may return a wider candidate set; the exact
            // distance is the correctness boundary.
            let exact = haversine_km(&center, &entry.coordinates);
            if exact > radius_km {
                continue;
            }
            candidates.push(GeoCandidate {
                user_id: entry.user_id,
                tags: entry.tags,
                distance_km: round_km(exact),
            });
        }

        tracing::debug!(radius_km, matches = candidates.len(), "radius query");
        Ok(candidates)
    }

    /// Computes the rounded distance between two stored users.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if either user has no geo entry.
    pub async fn distance_between(&self, user_a: &str, user_b: &str) -> Result<f64> {
        let a = self.get_entry(user_a).await?;
        let b = self.get_entry(user_b).await?;
        Ok(round_km(haversine_km(&a.coordinates, &b.coordinates)))
    }

    async fn get_entry(&self, user_id: &str) -> Result<GeoEntry> {
        let fields = self
            .store
            .get_document(COLLECTION, user_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Geo entry for user: {user_id}")))?;
        GeoEntry::from_document(fields)
    }
}
