//! The "send message" use case.

use crate::error::{CoreError, Result};

use super::store::ConversationStore;
use super::types::Message;

/// Composes the conversation store's get-or-create semantics for sending
/// a direct message.
pub struct MessagingFacade {
    conversations: ConversationStore,
}

impl MessagingFacade {
    /// Creates a new facade over the given conversation store.
    #[must_use]
    pub const fn new(conversations: ConversationStore) -> Self {
        Self { conversations }
    }

    /// Returns the underlying conversation store.
    #[must_use]
    pub const fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Sends a direct message, creating the conversation on first
    /// contact and reusing it thereafter.
    ///
    /// The two store calls are not atomic, but the conversation id is
    /// derived from the canonical pair: if two first-contact sends race,
    /// both creates write the same document and both messages land in it.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `sender_id == to_id`
    /// - `NotFound` if either participant is absent from the directory
    pub async fn send_message(
        &self,
        sender_id: &str,
        to_id: &str,
        content: &str,
    ) -> Result<Message> {
        if sender_id == to_id {
            return Err(CoreError::InvalidArgument(
                "Cannot message yourself".to_string(),
            ));
        }

        let conversation_id = match self.conversations.get_between(sender_id, to_id).await? {
            Some(conversation) => conversation.id,
            None => {
                tracing::debug!(sender_id, to_id, "first contact, creating conversation");
                self.conversations.create(sender_id, to_id).await?
            }
        };

        self.conversations
            .add_message(&conversation_id, sender_id, content)
            .await
    }
}
