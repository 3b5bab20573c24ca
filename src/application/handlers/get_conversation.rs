//! GetConversationHandler - read-only lookup for the presentation layer.

use std::sync::Arc;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, StoreError};

/// Error type for conversation lookup.
#[derive(Debug, thiserror::Error)]
pub enum GetConversationError {
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("storage failure: {0}")]
    Store(StoreError),
}

impl From<StoreError> for GetConversationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => GetConversationError::NotFound(id),
            other => GetConversationError::Store(other),
        }
    }
}

/// Handler for fetching a conversation by id.
pub struct GetConversationHandler {
    store: Arc<dyn ConversationStore>,
}

impl GetConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, id: ConversationId) -> Result<Conversation, GetConversationError> {
        Ok(self.store.load(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryConversationStore;

    #[tokio::test]
    async fn returns_the_stored_conversation() {
        let store = Arc::new(InMemoryConversationStore::new());
        let c = Conversation::new("email", "client@example.com", "summary", vec![]).unwrap();
        store.save(&c).await.unwrap();

        let handler = GetConversationHandler::new(store);
        let loaded = handler.handle(c.id()).await.unwrap();
        assert_eq!(loaded.id(), c.id());
    }

    #[tokio::test]
    async fn missing_conversation_is_not_found() {
        let handler = GetConversationHandler::new(Arc::new(InMemoryConversationStore::new()));
        let result = handler.handle(ConversationId::new()).await;
        assert!(matches!(result, Err(GetConversationError::NotFound(_))));
    }
}
