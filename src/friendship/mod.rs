//! Friendship lifecycle for Bandmate.
//!
//! A friendship is a single pairwise record moving through
//! `Requested -> Accepted | Rejected`, with a hard delete available from
//! any state. At most one live record exists per unordered pair; the
//! record id is derived from the canonical sorted pair, which makes
//! creation idempotent under concurrent requests.
//!
//! Direction matters only for authorization: only the recipient (`to`)
//! may respond, and only while the record is still `Requested`.

mod ledger;
pub mod types;

pub use ledger::FriendshipLedger;
pub use types::{Friendship, FriendshipStatus, FriendshipSummary};
