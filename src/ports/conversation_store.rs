//! Conversation Store Port - Interface for persisting dialogue state.
//!
//! One record per active conversation, keyed by its id. The store holds
//! exactly the aggregate's own fields; nothing else about the session is
//! persisted.

use async_trait::async_trait;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("failed to serialize conversation: {0}")]
    SerializationFailed(String),

    #[error("failed to deserialize conversation: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Port for persisting and loading conversations.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Saves (inserts or replaces) a conversation.
    async fn save(&self, conversation: &Conversation) -> Result<(), StoreError>;

    /// Loads a conversation by id.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no record exists.
    async fn load(&self, id: ConversationId) -> Result<Conversation, StoreError>;

    /// Checks whether a record exists for `id`.
    async fn exists(&self, id: ConversationId) -> Result<bool, StoreError>;

    /// Deletes the record for `id`, if present.
    async fn delete(&self, id: ConversationId) -> Result<(), StoreError>;
}
