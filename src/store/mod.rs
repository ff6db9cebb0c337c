//! Document store capability.
//!
//! The core never talks to a concrete storage engine. Every subsystem
//! receives a [`DocumentStore`] handle at construction and consumes only
//! this contract, so tests can substitute the in-memory implementation
//! and deployments can wire any document database that offers
//! read-after-write consistency per single document.
//!
//! No cross-document atomicity is assumed: each operation in the contract
//! touches exactly one document or runs one query, and a cancelled call
//! leaves no partial effect beyond a single completed write.

pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
pub use types::{Document, GeoDocument, SortDirection, StoredDocument};

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;

/// Contract for a remote document store.
///
/// Collections are flat namespaces of id-addressed documents. Queries are
/// shallow: they match a single field by equality, array membership, or
/// proximity. Every method is a suspension point.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a document by id. Returns `None` if absent.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Creates or fully replaces a document.
    async fn set_document(&self, collection: &str, id: &str, fields: Document) -> Result<()>;

    /// Merges the given fields into an existing document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the document does not exist.
    async fn update_fields(&self, collection: &str, id: &str, fields: Document) -> Result<()>;

    /// Deletes a document. Deleting an absent document is not an error.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;

    /// Returns all documents whose `field` equals `value`.
    async fn query_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>>;

    /// Returns all documents whose array-valued `field` contains `value`.
    async fn query_array_contains(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>>;

    /// Returns up to `limit` documents matching `filter_field == filter_value`,
    /// ordered by `order_field` in the given direction.
    async fn query_order_limit(
        &self,
        collection: &str,
        filter_field: &str,
        filter_value: &Value,
        order_field: &str,
        direction: SortDirection,
        limit: usize,
    ) -> Result<Vec<StoredDocument>>;

    /// Returns documents within `radius_km` of the center, annotated with
    /// their great-circle distance.
    ///
    /// Implementations read the nested `coordinates.latitude` and
    /// `coordinates.longitude` fields; documents without them are skipped.
    /// The result may be coarse (e.g. a cell range scan) - callers apply an
    /// exact distance filter on top.
    async fn query_near(
        &self,
        collection: &str,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<GeoDocument>>;
}
