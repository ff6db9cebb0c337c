//! Conversation and message persistence.

use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use serde_json::Value;
use uuid::Uuid;

use crate::directory::UserDirectory;
use crate::error::{CoreError, Result};
use crate::pair;
use crate::store::{Document, DocumentStore, SortDirection};

use super::types::{Conversation, ConversationSummary, Message};

/// Collection holding conversation records.
const CONVERSATIONS: &str = "conversations";
/// Collection holding the append-only message log.
const MESSAGES: &str = "messages";

/// Canonicalizes two-party conversations and their message logs.
///
/// Conversation ids are derived deterministically from the canonical
/// sorted member pair, so concurrent first-contact creation collapses
/// onto one document.
pub struct ConversationStore {
    store: Arc<dyn DocumentStore>,
    directory: Arc<dyn UserDirectory>,
}

impl ConversationStore {
    /// Creates a new conversation store over the given store and
    /// directory.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { store, directory }
    }

    /// Looks up the conversation between two members, independent of
    /// argument order. A miss is a legitimate `Ok(None)`, consumed by the
    /// get-or-create send path - not an error.
    pub async fn get_between(&self, member_a: &str, member_b: &str) -> Result<Option<Conversation>> {
        let id = pair::digest_id(member_a, member_b);
        let Some(fields) = self.store.get_document(CONVERSATIONS, &id).await? else {
            return Ok(None);
        };
        Conversation::from_document(&id, fields).map(Some)
    }

    /// Creates the conversation for a member pair and returns its id.
    ///
    /// Callers are expected to check [`get_between`] first; the
    /// deterministic id makes a concurrent double-create collapse onto
    /// the same document rather than fork the history.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if either member is absent from the directory.
    ///
    /// [`get_between`]: Self::get_between
    pub async fn create(&self, member_a: &str, member_b: &str) -> Result<String> {
        self.directory.get(member_a).await?;
        self.directory.get(member_b).await?;

        let (lo, hi) = pair::canonical(member_a, member_b);
        let id = pair::digest_id(member_a, member_b);
        let conversation = Conversation {
            id: id.clone(),
            members: vec![lo.to_string(), hi.to_string()],
            created_at: Utc::now().timestamp_millis(),
        };
        let fields = conversation.to_document()?;
        self.store.set_document(CONVERSATIONS, &id, fields).await?;

        tracing::info!(conversation_id = id, "conversation created");
        Ok(id)
    }

    /// Appends a message to a conversation's log.
    pub async fn add_message(
        &self,
        conversation_id: &str,
        sender_id: &str,
        content: &str,
    ) -> Result<Message> {
        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now().timestamp_millis(),
            read_at: None,
        };
        let fields = message.to_document()?;
        self.store.set_document(MESSAGES, &message.id, fields).await?;

        tracing::debug!(conversation_id, message_id = message.id, "message appended");
        Ok(message)
    }

    /// Returns the full message log for a conversation, most recent
    /// first. Ties on the timestamp break by ascending message id, so
    /// repeated calls agree on the order.
    pub async fn get_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let docs = self
            .store
            .query_equals(
                MESSAGES,
                "conversation_id",
                &Value::String(conversation_id.to_string()),
            )
            .await?;

        let mut messages = docs
            .into_iter()
            .map(|doc| Message::from_document(&doc.id, doc.fields))
            .collect::<Result<Vec<_>>>()?;
        messages.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(messages)
    }

    /// Returns the message log for a member, verifying membership first,
    /// and stamps the read marker on messages from the other member.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the conversation is absent
    /// - `Unauthorized` if `member_id` is not a member
    pub async fn read_messages(
        &self,
        member_id: &str,
        conversation_id: &str,
    ) -> Result<Vec<Message>> {
        let conversation = self.get(conversation_id).await?;
        if !conversation.is_member(member_id) {
            return Err(CoreError::Unauthorized(format!(
                "User {member_id} is not part of conversation {conversation_id}"
            )));
        }

        let mut messages = self.get_messages(conversation_id).await?;
        let now = Utc::now().timestamp_millis();
        for message in &mut messages {
            if message.read_at.is_none() && message.sender_id != member_id {
                let mut fields = Document::new();
                fields.insert("read_at".to_string(), Value::from(now));
                self.store.update_fields(MESSAGES, &message.id, fields).await?;
                message.read_at = Some(now);
            }
        }
        Ok(messages)
    }

    /// Lists every conversation containing the member, each annotated
    /// with its single most recent message via a bounded top-1 lookup.
    pub async fn get_by_member(&self, member_id: &str) -> Result<Vec<ConversationSummary>> {
        let docs = self
            .store
            .query_array_contains(
                CONVERSATIONS,
                "members",
                &Value::String(member_id.to_string()),
            )
            .await?;

        let summaries = docs.into_iter().map(|doc| async move {
            let conversation = Conversation::from_document(&doc.id, doc.fields)?;
            let latest_message = self.latest_message(&conversation.id).await?;
            Ok::<_, CoreError>(ConversationSummary {
                conversation,
                latest_message,
            })
        });
        try_join_all(summaries).await
    }

    /// Fetches a conversation by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent.
    pub async fn get(&self, conversation_id: &str) -> Result<Conversation> {
        let fields = self
            .store
            .get_document(CONVERSATIONS, conversation_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Conversation: {conversation_id}")))?;
        Conversation::from_document(conversation_id, fields)
    }

    async fn latest_message(&self, conversation_id: &str) -> Result<Option<Message>> {
        let top = self
            .store
            .query_order_limit(
                MESSAGES,
                "conversation_id",
                &Value::String(conversation_id.to_string()),
                "created_at",
                SortDirection::Descending,
                1,
            )
            .await?;
        top.into_iter()
            .next()
            .map(|doc| Message::from_document(&doc.id, doc.fields))
            .transpose()
    }
}
