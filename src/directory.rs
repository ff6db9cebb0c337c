//! User directory capability.
//!
//! Friendship and conversation operations validate referenced users before
//! writing relationship records. They do so through the [`UserDirectory`]
//! trait so tests can substitute a canned directory; [`StoreDirectory`] is
//! the store-backed implementation over the `users` collection.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::geo::Coordinates;
use crate::store::{Document, DocumentStore};

/// Collection holding user profiles.
const COLLECTION: &str = "users";

/// A user's first and last name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName {
    /// First name.
    pub first: String,
    /// Last name.
    pub last: String,
}

/// A user profile.
///
/// The core treats profiles as read-only reference data owned by the
/// directory; relationship records reference them by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The user's id.
    #[serde(skip)]
    pub id: String,
    /// First and last name.
    pub name: FullName,
    /// Last known coordinates.
    pub coordinates: Coordinates,
    /// Free-form self description.
    #[serde(default)]
    pub about: Option<String>,
    /// Instruments the user plays.
    #[serde(default)]
    pub instruments: BTreeSet<String>,
    /// Genres the user is interested in.
    #[serde(default)]
    pub genres: BTreeSet<String>,
}

impl Profile {
    pub(crate) fn to_document(&self) -> Result<Document> {
        let value = serde_json::to_value(self)
            .map_err(|e| CoreError::Store(format!("Failed to encode profile: {e}")))?;
        let Value::Object(fields) = value else {
            return Err(CoreError::Store("Profile did not encode to an object".to_string()));
        };
        Ok(fields)
    }

    pub(crate) fn from_document(id: &str, fields: Document) -> Result<Self> {
        let mut profile: Self = serde_json::from_value(Value::Object(fields))
            .map_err(|e| CoreError::Store(format!("Malformed profile: {e}")))?;
        profile.id = id.to_string();
        Ok(profile)
    }
}

/// Resolves user ids to profiles.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetches a profile by user id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such user exists.
    async fn get(&self, user_id: &str) -> Result<Profile>;
}

/// Store-backed [`UserDirectory`] over the `users` collection.
pub struct StoreDirectory {
    store: Arc<dyn DocumentStore>,
}

impl StoreDirectory {
    /// Creates a new directory over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates or replaces a profile document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for malformed coordinates.
    pub async fn create(&self, profile: &Profile) -> Result<()> {
        profile.coordinates.validate()?;
        let fields = profile.to_document()?;
        self.store
            .set_document(COLLECTION, &profile.id, fields)
            .await
    }
}

#[async_trait]
impl UserDirectory for StoreDirectory {
    async fn get(&self, user_id: &str) -> Result<Profile> {
        let fields = self
            .store
            .get_document(COLLECTION, user_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("User: {user_id}")))?;
        Profile::from_document(user_id, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn profile(id: &str) -> Profile {
        Profile {
            id: id.to_string(),
            name: FullName {
                first: "Ada".to_string(),
                last: "Lovelace".to_string(),
            },
            coordinates: Coordinates::new(51.5074, -0.1278),
            about: Some("Analytical engines and analog synths".to_string()),
            instruments: BTreeSet::from(["piano".to_string()]),
            genres: BTreeSet::from(["electronic".to_string()]),
        }
    }

    #[tokio::test]
    async fn create_then_get_roundtrip() {
        let directory = StoreDirectory::new(Arc::new(MemoryStore::new()));
        directory.create(&profile("u1")).await.unwrap();

        let fetched = directory.get("u1").await.unwrap();
        assert_eq!(fetched.id, "u1");
        assert_eq!(fetched.name.first, "Ada");
        assert!(fetched.instruments.contains("piano"));
    }

    #[tokio::test]
    async fn get_missing_user_is_not_found() {
        let directory = StoreDirectory::new(Arc::new(MemoryStore::new()));
        let result = directory.get("nobody").await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn create_rejects_bad_coordinates() {
        let directory = StoreDirectory::new(Arc::new(MemoryStore::new()));
        let mut bad = profile("u1");
        bad.coordinates = Coordinates::new(999.0, 0.0);
        assert!(matches!(
            directory.create(&bad).await,
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn profile_document_roundtrip_preserves_fields() {
        let original = profile("u1");
        let doc = original.to_document().unwrap();
        // The id lives outside the document.
        assert!(!doc.contains_key("id"));

        let recovered = Profile::from_document("u1", doc).unwrap();
        assert_eq!(recovered, original);
    }
}
