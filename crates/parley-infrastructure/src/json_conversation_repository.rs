//! JSON file based ConversationRepository implementation.

use crate::paths::ParleyPaths;
use crate::storage::JsonDocument;
use async_trait::async_trait;
use parley_core::conversation::{Conversation, ConversationMap, ConversationRepository, Turn};
use parley_core::error::{ParleyError, Result};
use parley_core::id::generate_id;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tokio::task;

/// Conversation store kept in a single `conversations.json` document.
pub struct JsonConversationRepository {
    document: JsonDocument<ConversationMap>,
    /// Serializes load-mutate-save sequences within this process.
    lock: Mutex<()>,
}

impl JsonConversationRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            document: JsonDocument::new(path),
            lock: Mutex::new(()),
        }
    }

    pub fn from_paths(paths: &ParleyPaths) -> Self {
        Self::new(paths.conversations_file())
    }

    async fn load(&self) -> Result<ConversationMap> {
        let _guard = self.lock.lock().await;
        let document = self.document.clone();

        task::spawn_blocking(move || document.load(ConversationMap::new()))
            .await
            .map_err(|e| ParleyError::io(format!("Failed to spawn blocking task: {}", e)))?
    }

    async fn modify<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut ConversationMap) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let document = self.document.clone();

        task::spawn_blocking(move || document.update(ConversationMap::new(), f))
            .await
            .map_err(|e| ParleyError::io(format!("Failed to spawn blocking task: {}", e)))?
    }
}

#[async_trait]
impl ConversationRepository for JsonConversationRepository {
    async fn list(&self) -> Result<ConversationMap> {
        self.load().await
    }

    async fn create(&self) -> Result<String> {
        let conversation_id = generate_id();

        let key = conversation_id.clone();
        self.modify(move |conversations| {
            conversations.insert(key, Conversation::new());
            Ok(())
        })
        .await?;

        tracing::debug!("[ConversationRepository] Created conversation {}", conversation_id);
        Ok(conversation_id)
    }

    async fn get(&self, conversation_id: &str) -> Result<Option<Conversation>> {
        let mut conversations = self.load().await?;
        Ok(conversations.remove(conversation_id))
    }

    async fn rename(&self, conversation_id: &str, title: &str) -> Result<bool> {
        let conversation_id = conversation_id.to_string();
        let title = title.to_string();

        self.modify(move |conversations| match conversations.get_mut(&conversation_id) {
            Some(conversation) => {
                conversation.title = title;
                Ok(true)
            }
            None => Ok(false),
        })
        .await
    }

    async fn delete(&self, conversation_id: &str) -> Result<bool> {
        let conversation_id = conversation_id.to_string();
        self.modify(move |conversations| Ok(conversations.remove(&conversation_id).is_some()))
            .await
    }

    async fn append_turns(
        &self,
        conversation_id: &str,
        turns: Vec<Turn>,
        model: Option<&str>,
    ) -> Result<Conversation> {
        let conversation_id = conversation_id.to_string();
        let model = model.map(str::to_string);

        self.modify(move |conversations| {
            let stored = conversations
                .get_mut(&conversation_id)
                .ok_or_else(|| ParleyError::not_found("conversation", conversation_id.clone()))?;

            // Apply to a copy so a rejected turn leaves the stored entry intact.
            let mut updated = stored.clone();
            for turn in turns {
                updated.append_turn(turn)?;
            }
            if model.is_some() {
                updated.model = model;
            }

            *stored = updated.clone();
            Ok(updated)
        })
        .await
    }
}
