//! Friendship lifecycle operations.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use crate::directory::UserDirectory;
use crate::error::{CoreError, Result};
use crate::pair;
use crate::store::{Document, DocumentStore};

use super::types::{Friendship, FriendshipStatus, FriendshipSummary};

/// Collection holding friendship records.
const COLLECTION: &str = "friendships";

/// Manages pairwise relationship records and their lifecycle.
///
/// Record ids are derived deterministically from the canonical sorted
/// pair, so concurrent requests for the same pair write the same document
/// and cannot create duplicates - the store's single-document atomicity
/// is enough.
pub struct FriendshipLedger {
    store: Arc<dyn DocumentStore>,
    directory: Arc<dyn UserDirectory>,
}

impl FriendshipLedger {
    /// Creates a new ledger over the given store and directory.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { store, directory }
    }

    /// Creates a friendship request from one user to another.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `from == to`
    /// - `NotFound` if either user is absent from the directory
    /// - `Conflict` if a record already exists for the unordered pair
    pub async fn request(&self, from: &str, to: &str) -> Result<Friendship> {
        if from == to {
            return Err(CoreError::InvalidArgument(
                "Cannot request friendship with yourself".to_string(),
            ));
        }

        self.directory.get(from).await?;
        self.directory.get(to).await?;

        let id = pair::digest_id(from, to);
        if self.store.get_document(COLLECTION, &id).await?.is_some() {
            return Err(CoreError::Conflict(format!(
                "Friendship already exists between {from} and {to}"
            )));
        }

        let now = Utc::now().timestamp_millis();
        let friendship = Friendship {
            id: id.clone(),
            from: from.to_string(),
            to: to.to_string(),
            status: FriendshipStatus::Requested,
            created_at: now,
            updated_at: now,
        };
        let fields = friendship.to_document()?;
        self.store.set_document(COLLECTION, &id, fields).await?;

        tracing::info!(from, to, id, "friendship requested");
        Ok(friendship)
    }

    /// Fetches a friendship record by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent.
    pub async fn get(&self, friendship_id: &str) -> Result<Friendship> {
        let fields = self
            .store
            .get_document(COLLECTION, friendship_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Friendship: {friendship_id}")))?;
        Friendship::from_document(friendship_id, fields)
    }

    /// Responds to a pending request: the recipient accepts or rejects.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the record is absent
    /// - `Unauthorized` unless the actor is the recipient, the record is
    ///   still `Requested`, and the new status is terminal
    pub async fn respond(
        &self,
        acting_id: &str,
        friendship_id: &str,
        new_status: FriendshipStatus,
    ) -> Result<Friendship> {
        let mut friendship = self.get(friendship_id).await?;

        let permitted = friendship.to == acting_id
            && friendship.status == FriendshipStatus::Requested
            && new_status.is_terminal();
        if !permitted {
            return Err(CoreError::Unauthorized(format!(
                "User {acting_id} may not respond to friendship {friendship_id}"
            )));
        }

        let now = Utc::now().timestamp_millis();
        let mut fields = Document::new();
        fields.insert("status".to_string(), json!(new_status));
        fields.insert("updated_at".to_string(), Value::from(now));
        self.store
            .update_fields(COLLECTION, friendship_id, fields)
            .await?;

        friendship.status = new_status;
        friendship.updated_at = now;

        tracing::info!(
            acting_id,
            friendship_id,
            status = new_status.as_str(),
            "friendship responded"
        );
        Ok(friendship)
    }

    /// Hard-deletes a friendship record. Either party may do this at any
    /// state; no history is retained.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the record is absent
    /// - `Unauthorized` if the actor is not one of the two parties
    pub async fn unfriend(&self, acting_id: &str, friendship_id: &str) -> Result<()> {
        let friendship = self.get(friendship_id).await?;

        if !friendship.involves(acting_id) {
            return Err(CoreError::Unauthorized(format!(
                "User {acting_id} is not part of friendship {friendship_id}"
            )));
        }

        self.store.delete_document(COLLECTION, friendship_id).await?;
        tracing::info!(acting_id, friendship_id, "friendship deleted");
        Ok(())
    }

    /// Lists every record the user participates in, from either side,
    /// with human-readable timestamps.
    pub async fn get_by_user(&self, user_id: &str) -> Result<Vec<FriendshipSummary>> {
        let user = Value::String(user_id.to_string());
        let from_side = self.store.query_equals(COLLECTION, "from", &user).await?;
        let to_side = self.store.query_equals(COLLECTION, "to", &user).await?;

        let mut summaries = Vec::with_capacity(from_side.len() + to_side.len());
        for doc in from_side.into_iter().chain(to_side) {
            let friendship = Friendship::from_document(&doc.id, doc.fields)?;
            let summary = friendship.to_summary();
            // Union, not concatenation: a record must appear once even if
            // the two queries raced a write.
            if !summaries.iter().any(|s: &FriendshipSummary| s.id == summary.id) {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::directory::{FullName, Profile, StoreDirectory};
    use crate::geo::Coordinates;
    use crate::store::MemoryStore;

    async fn ledger_with_users(users: &[&str]) -> FriendshipLedger {
        let store = Arc::new(MemoryStore::new());
        let directory = StoreDirectory::new(store.clone());
        for user in users {
            directory
                .create(&Profile {
                    id: (*user).to_string(),
                    name: FullName {
                        first: (*user).to_string(),
                        last: "Test".to_string(),
                    },
                    coordinates: Coordinates::new(0.0, 0.0),
                    about: None,
                    instruments: BTreeSet::new(),
                    genres: BTreeSet::new(),
                })
                .await
                .unwrap();
        }
        FriendshipLedger::new(store, Arc::new(directory))
    }

    #[tokio::test]
    async fn request_creates_requested_record() {
        let ledger = ledger_with_users(&["alice", "bob"]).await;
        let friendship = ledger.request("alice", "bob").await.unwrap();

        assert_eq!(friendship.from, "alice");
        assert_eq!(friendship.to, "bob");
        assert_eq!(friendship.status, FriendshipStatus::Requested);
        assert_eq!(friendship.created_at, friendship.updated_at);
    }

    #[tokio::test]
    async fn request_to_unknown_user_is_not_found() {
        let ledger = ledger_with_users(&["alice"]).await;
        let result = ledger.request("alice", "ghost").await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn request_to_self_is_invalid() {
        let ledger = ledger_with_users(&["alice"]).await;
        let result = ledger.request("alice", "alice").await;
        assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn duplicate_request_conflicts_in_either_direction() {
        let ledger = ledger_with_users(&["alice", "bob"]).await;
        ledger.request("alice", "bob").await.unwrap();

        assert!(matches!(
            ledger.request("alice", "bob").await,
            Err(CoreError::Conflict(_))
        ));
        assert!(matches!(
            ledger.request("bob", "alice").await,
            Err(CoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn recipient_can_accept() {
        let ledger = ledger_with_users(&["alice", "bob"]).await;
        let friendship = ledger.request("alice", "bob").await.unwrap();

        let accepted = ledger
            .respond("bob", &friendship.id, FriendshipStatus::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted.status, FriendshipStatus::Accepted);
    }

    #[tokio::test]
    async fn initiator_cannot_respond() {
        let ledger = ledger_with_users(&["alice", "bob"]).await;
        let friendship = ledger.request("alice", "bob").await.unwrap();

        let result = ledger
            .respond("alice", &friendship.id, FriendshipStatus::Accepted)
            .await;
        assert!(matches!(result, Err(CoreError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn responding_twice_is_unauthorized() {
        let ledger = ledger_with_users(&["alice", "bob"]).await;
        let friendship = ledger.request("alice", "bob").await.unwrap();
        ledger
            .respond("bob", &friendship.id, FriendshipStatus::Rejected)
            .await
            .unwrap();

        // Terminal states admit no further transition.
        let result = ledger
            .respond("bob", &friendship.id, FriendshipStatus::Accepted)
            .await;
        assert!(matches!(result, Err(CoreError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn respond_cannot_reset_to_requested() {
        let ledger = ledger_with_users(&["alice", "bob"]).await;
        let friendship = ledger.request("alice", "bob").await.unwrap();

        let result = ledger
            .respond("bob", &friendship.id, FriendshipStatus::Requested)
            .await;
        assert!(matches!(result, Err(CoreError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn either_party_can_unfriend_but_no_third_party() {
        let ledger = ledger_with_users(&["alice", "bob", "carol"]).await;
        let friendship = ledger.request("alice", "bob").await.unwrap();

        assert!(matches!(
            ledger.unfriend("carol", &friendship.id).await,
            Err(CoreError::Unauthorized(_))
        ));
        ledger.unfriend("alice", &friendship.id).await.unwrap();

        assert!(matches!(
            ledger.get(&friendship.id).await,
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unfriend_allows_a_fresh_request() {
        let ledger = ledger_with_users(&["alice", "bob"]).await;
        let friendship = ledger.request("alice", "bob").await.unwrap();
        ledger.unfriend("bob", &friendship.id).await.unwrap();

        // Hard delete retains no history; the pair may start over.
        let renewed = ledger.request("bob", "alice").await.unwrap();
        assert_eq!(renewed.from, "bob");
        assert_eq!(renewed.status, FriendshipStatus::Requested);
    }

    #[tokio::test]
    async fn get_by_user_sees_both_directions() {
        let ledger = ledger_with_users(&["alice", "bob", "carol"]).await;
        ledger.request("alice", "bob").await.unwrap();
        ledger.request("carol", "alice").await.unwrap();

        let summaries = ledger.get_by_user("alice").await.unwrap();
        assert_eq!(summaries.len(), 2);

        let bob_side = ledger.get_by_user("bob").await.unwrap();
        assert_eq!(bob_side.len(), 1);
        assert_eq!(bob_side[0].from, "alice");
    }
}
