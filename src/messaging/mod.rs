//! Direct messaging for Bandmate.
//!
//! Conversations are strictly two-party and canonical: the member pair is
//! sorted and the conversation id derives from the sorted pair, so
//! `{a, b}` and `{b, a}` always resolve to the same record and a racing
//! first contact cannot fork the history.
//!
//! Messages form an append-only log per conversation, returned most
//! recent first. A message is immutable after creation except for its
//! read marker, stamped when the other member reads the log.

mod facade;
mod store;
pub mod types;

pub use facade::MessagingFacade;
pub use store::ConversationStore;
pub use types::{Conversation, ConversationSummary, Message};
