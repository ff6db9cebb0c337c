//! In-memory document store for tests.
//!
//! Implements the full [`DocumentStore`] contract over process-local maps.
//! The proximity query is a linear haversine scan; it ignores the geohash
//! cell entirely, which exercises the callers' exact-distance filtering
//! rather than any index behavior.

use std::collections::{BTreeMap, HashMap};
use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{CoreError, Result};
use crate::geo::types::Coordinates;
use crate::geo::haversine_km;

use super::types::{Document, GeoDocument, SortDirection, StoredDocument};
use super::DocumentStore;

/// In-memory [`DocumentStore`] implementation.
///
/// Offers read-after-write consistency per document and nothing more,
/// matching the contract's weakest allowed backend.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Returns whether a collection holds no documents.
    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }
}

/// Orders two field values for `query_order_limit`. Only scalar types
/// that the core actually sorts on (numbers, strings, booleans) have a
/// defined order; mixed or compound values compare equal.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Reads the nested `coordinates` object from a document's fields.
fn read_coordinates(fields: &Document) -> Option<Coordinates> {
    let coords = fields.get("coordinates")?.as_object()?;
    Some(Coordinates::new(
        coords.get("latitude")?.as_f64()?,
        coords.get("longitude")?.as_f64()?,
    ))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set_document(&self, collection: &str, id: &str, fields: Document) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn update_fields(&self, collection: &str, id: &str, fields: Document) -> Result<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| CoreError::NotFound(format!("Document: {collection}/{id}")))?;
        for (key, value) in fields {
            doc.insert(key, value);
        }
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn query_equals(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, fields)| fields.get(field) == Some(value))
            .map(|(id, fields)| StoredDocument {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    async fn query_array_contains(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, fields)| {
                fields
                    .get(field)
                    .and_then(Value::as_array)
                    .is_some_and(|items| items.contains(value))
            })
            .map(|(id, fields)| StoredDocument {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    async fn query_order_limit(
        &self,
        collection: &str,
        filter_field: &str,
        filter_value: &Value,
        order_field: &str,
        direction: SortDirection,
        limit: usize,
    ) -> Result<Vec<StoredDocument>> {
        let mut matched = self
            .query_equals(collection, filter_field, filter_value)
            .await?;

        matched.sort_by(|a, b| {
            let ord = compare_values(
                a.fields.get(order_field).unwrap_or(&Value::Null),
                b.fields.get(order_field).unwrap_or(&Value::Null),
            );
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        matched.truncate(limit);
        Ok(matched)
    }

    async fn query_near(
        &self,
        collection: &str,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<GeoDocument>> {
        let center = Coordinates::new(latitude, longitude);
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut results = Vec::new();
        for (id, fields) in docs {
            let Some(coordinates) = read_coordinates(fields) else {
                continue;
            };
            let distance_km = haversine_km(&center, &coordinates);
            if distance_km <= radius_km {
                results.push(GeoDocument {
                    id: id.clone(),
                    fields: fields.clone(),
                    distance_km,
                });
            }
        }
        Ok(results)
    }
}
