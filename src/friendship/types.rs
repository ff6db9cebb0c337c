//! Core types for the friendship lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::store::Document;

/// Status of a friendship record.
///
/// `Requested` is the only initial state. `Accepted` and `Rejected` are
/// terminal and reachable only from `Requested`, only by the recipient.
/// Any state is exitable through a hard delete (`unfriend`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    /// Invitation sent, awaiting the recipient's response.
    Requested,
    /// The recipient accepted.
    Accepted,
    /// The recipient rejected.
    Rejected,
}

impl FriendshipStatus {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "requested" => Some(Self::Requested),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns whether the status admits no further transition.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

/// A pairwise relationship record.
///
/// At most one live record exists per unordered `{from, to}` pair;
/// direction matters only for authorizing the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friendship {
    /// Record id, derived from the canonical pair.
    #[serde(skip)]
    pub id: String,
    /// The initiating user.
    pub from: String,
    /// The receiving user; the only one who may respond.
    pub to: String,
    /// Current lifecycle state.
    pub status: FriendshipStatus,
    /// Creation time, Unix milliseconds.
    pub created_at: i64,
    /// Last transition time, Unix milliseconds.
    pub updated_at: i64,
}

impl Friendship {
    /// Returns whether the given user is one of the two parties.
    #[must_use]
    pub fn involves(&self, user_id: &str) -> bool {
        self.from == user_id || self.to == user_id
    }

    pub(crate) fn to_document(&self) -> Result<Document> {
        let value = serde_json::to_value(self)
            .map_err(|e| CoreError::Store(format!("Failed to encode friendship: {e}")))?;
        let Value::Object(fields) = value else {
            return Err(CoreError::Store(
                "Friendship did not encode to an object".to_string(),
            ));
        };
        Ok(fields)
    }

    pub(crate) fn from_document(id: &str, fields: Document) -> Result<Self> {
        let mut friendship: Self = serde_json::from_value(Value::Object(fields))
            .map_err(|e| CoreError::Store(format!("Malformed friendship: {e}")))?;
        friendship.id = id.to_string();
        Ok(friendship)
    }

    /// Renders the record with human-readable timestamps.
    #[must_use]
    pub fn to_summary(&self) -> FriendshipSummary {
        FriendshipSummary {
            id: self.id.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            status: self.status,
            created_at: format_millis(self.created_at),
            updated_at: format_millis(self.updated_at),
        }
    }
}

/// A friendship as listed per user, timestamps rendered RFC 2822.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendshipSummary {
    /// Record id.
    pub id: String,
    /// The initiating user.
    pub from: String,
    /// The receiving user.
    pub to: String,
    /// Current lifecycle state.
    pub status: FriendshipStatus,
    /// Creation time, e.g. `Mon, 31 Aug 2026 12:00:00 +0000`.
    pub created_at: String,
    /// Last transition time.
    pub updated_at: String,
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc2822())
        .unwrap_or_default()
}
