//! In-Memory Conversation Store Adapter
//!
//! Keeps conversations in a process-local map. Useful for testing and
//! single-node development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, StoreError};

/// In-memory storage for conversations.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
}

impl InMemoryConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all stored conversations (useful for tests).
    pub async fn clear(&self) {
        self.conversations.write().await.clear();
    }

    /// Number of stored conversations.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let mut conversations = self.conversations.write().await;
        conversations.insert(conversation.id(), conversation.clone());
        Ok(())
    }

    async fn load(&self, id: ConversationId) -> Result<Conversation, StoreError> {
        let conversations = self.conversations.read().await;
        conversations
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn exists(&self, id: ConversationId) -> Result<bool, StoreError> {
        Ok(self.conversations.read().await.contains_key(&id))
    }

    async fn delete(&self, id: ConversationId) -> Result<(), StoreError> {
        self.conversations.write().await.remove(&id);
        Ok(())
    }
}
