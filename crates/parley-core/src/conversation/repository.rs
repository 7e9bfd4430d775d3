//! Conversation repository trait.
//!
//! Defines the interface for conversation persistence operations.

use super::model::{Conversation, ConversationMap, Turn};
use crate::error::Result;

/// An abstract store of conversations.
///
/// # Implementation Notes
///
/// Every mutation rewrites the whole backing document. Implementations
/// serialize each load-mutate-save sequence so that concurrent callers do
/// not lose each other's updates.
#[async_trait::async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Returns every conversation keyed by id.
    async fn list(&self) -> Result<ConversationMap>;

    /// Creates an empty conversation and returns its generated id.
    async fn create(&self) -> Result<String>;

    /// Finds a conversation by id.
    async fn get(&self, conversation_id: &str) -> Result<Option<Conversation>>;

    /// Replaces the title. Returns `false` if the id is unknown.
    async fn rename(&self, conversation_id: &str, title: &str) -> Result<bool>;

    /// Deletes a conversation. Returns `false` if the id is unknown.
    async fn delete(&self, conversation_id: &str) -> Result<bool>;

    /// Appends turns to the history and persists the store.
    ///
    /// All turns are applied under one lock and written with one save; if
    /// any turn breaks the alternation nothing is written.
    ///
    /// `model` records the provider that produced the reply, when known.
    ///
    /// Returns the updated conversation, or `NotFound` for an unknown id.
    async fn append_turns(
        &self,
        conversation_id: &str,
        turns: Vec<Turn>,
        model: Option<&str>,
    ) -> Result<Conversation>;

    /// Appends a single turn and persists the store.
    async fn append_turn(&self, conversation_id: &str, turn: Turn) -> Result<Conversation> {
        self.append_turns(conversation_id, vec![turn], None).await
    }
}
