//! File-backed Conversation Store Adapter
//!
//! One pretty-printed JSON file per conversation under a configured
//! directory, named `<conversation-id>.json`. Survives restarts without
//! needing a database.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, StoreError};

/// Conversation store persisting each record as a JSON file.
#[derive(Debug, Clone)]
pub struct FileConversationStore {
    dir: PathBuf,
}

impl FileConversationStore {
    /// Creates a store rooted at `dir`, creating the directory if needed.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(Self { dir })
    }

    /// Directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: ConversationId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(conversation)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
        tokio::fs::write(self.path_for(conversation.id()), json)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }

    async fn load(&self, id: ConversationId) -> Result<Conversation, StoreError> {
        let bytes = match tokio::fs::read(self.path_for(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id));
            }
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::DeserializationFailed(e.to_string()))
    }

    async fn exists(&self, id: ConversationId) -> Result<bool, StoreError> {
        Ok(tokio::fs::try_exists(self.path_for(id))
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?)
    }

    async fn delete(&self, id: ConversationId) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }
}
