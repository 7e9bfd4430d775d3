//! Chat use cases.
//!
//! `ChatService` binds a request to a conversation, an agent and a provider.
//! It owns no state of its own: the stores and the provider registry are
//! injected at construction.

use parley_core::agent::{
    AgentMap, AgentRepository, CreateAgentRequest, DEFAULT_AGENT_ID, UpdateAgentRequest,
};
use parley_core::conversation::{ConversationMap, ConversationRepository, Turn};
use parley_core::error::{ParleyError, Result};
use parley_infrastructure::{JsonAgentRepository, JsonConversationRepository, ParleyPaths};
use parley_interaction::{ProviderRegistry, build_prompt};
use std::sync::Arc;

use crate::message::{ChatSnapshot, ProviderListing, SendMessageRequest, SendMessageResponse};

/// Service for chat, conversation and agent management.
pub struct ChatService {
    agents: Arc<dyn AgentRepository>,
    conversations: Arc<dyn ConversationRepository>,
    providers: ProviderRegistry,
}

impl ChatService {
    pub fn new(
        agents: Arc<dyn AgentRepository>,
        conversations: Arc<dyn ConversationRepository>,
        providers: ProviderRegistry,
    ) -> Self {
        Self {
            agents,
            conversations,
            providers,
        }
    }

    /// Creates a service backed by the JSON documents under `paths`.
    pub fn from_paths(paths: &ParleyPaths, providers: ProviderRegistry) -> Self {
        Self::new(
            Arc::new(JsonAgentRepository::from_paths(paths)),
            Arc::new(JsonConversationRepository::from_paths(paths)),
            providers,
        )
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    // ============================================================================
    // Conversations
    // ============================================================================

    /// Returns the page state, creating a first conversation if none exist.
    ///
    /// `current` is the conversation the client last had open. If it no
    /// longer exists the most recently created conversation is used.
    pub async fn snapshot(&self, current: Option<&str>) -> Result<ChatSnapshot> {
        let mut conversations = self.conversations.list().await?;
        if conversations.is_empty() {
            let chat_id = self.conversations.create().await?;
            tracing::info!("[ChatService] Created initial conversation {}", chat_id);
            conversations = self.conversations.list().await?;
        }

        let current_chat_id = current
            .filter(|id| conversations.contains_key(*id))
            .map(str::to_string)
            .or_else(|| latest_id(&conversations))
            .ok_or_else(|| ParleyError::internal("conversation store is empty after bootstrap"))?;

        let history = conversations
            .get(&current_chat_id)
            .map(|conversation| conversation.history.clone())
            .unwrap_or_default();

        Ok(ChatSnapshot {
            current_chat_id,
            history,
            conversations,
            agents: self.agents.list().await?,
        })
    }

    pub async fn list_conversations(&self) -> Result<ConversationMap> {
        self.conversations.list().await
    }

    /// Starts a new empty conversation.
    pub async fn create_conversation(&self) -> Result<String> {
        let chat_id = self.conversations.create().await?;
        tracing::info!("[ChatService] New conversation {}", chat_id);
        Ok(chat_id)
    }

    /// Returns the history of a conversation to switch to.
    pub async fn switch_conversation(&self, chat_id: &str) -> Result<Vec<Turn>> {
        self.conversations
            .get(chat_id)
            .await?
            .map(|conversation| conversation.history)
            .ok_or_else(|| ParleyError::not_found("conversation", chat_id))
    }

    pub async fn rename_conversation(&self, chat_id: &str, title: &str) -> Result<()> {
        if self.conversations.rename(chat_id, title).await? {
            Ok(())
        } else {
            Err(ParleyError::not_found("conversation", chat_id))
        }
    }

    /// Deletes a conversation and returns the id the client should switch
    /// to, if any conversation remains.
    pub async fn delete_conversation(&self, chat_id: &str) -> Result<Option<String>> {
        if !self.conversations.delete(chat_id).await? {
            return Err(ParleyError::not_found("conversation", chat_id));
        }
        tracing::info!("[ChatService] Deleted conversation {}", chat_id);

        let remaining = self.conversations.list().await?;
        Ok(latest_id(&remaining))
    }

    // ============================================================================
    // Agents
    // ============================================================================

    pub async fn list_agents(&self) -> Result<AgentMap> {
        self.agents.list().await
    }

    pub async fn create_agent(&self, request: &CreateAgentRequest) -> Result<String> {
        let agent_id = self
            .agents
            .create(request.resolved_name(), request.resolved_instruction())
            .await?;
        tracing::info!("[ChatService] Created agent {}", agent_id);
        Ok(agent_id)
    }

    pub async fn update_agent(&self, agent_id: &str, request: &UpdateAgentRequest) -> Result<()> {
        let updated = self
            .agents
            .update(
                agent_id,
                request.name.as_deref(),
                request.instruction.as_deref(),
            )
            .await?;
        if updated {
            Ok(())
        } else {
            Err(ParleyError::not_found("agent", agent_id))
        }
    }

    /// Deletes an agent. The `default` agent is refused with `Forbidden`.
    pub async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        if agent_id == DEFAULT_AGENT_ID {
            return Err(ParleyError::Forbidden(
                "the default agent cannot be deleted".to_string(),
            ));
        }
        if self.agents.delete(agent_id).await? {
            tracing::info!("[ChatService] Deleted agent {}", agent_id);
            Ok(())
        } else {
            Err(ParleyError::not_found("agent", agent_id))
        }
    }

    // ============================================================================
    // Providers and messages
    // ============================================================================

    pub fn list_providers(&self) -> ProviderListing {
        ProviderListing {
            models: self.providers.list(),
            default: self.providers.default_id(None).map(str::to_string),
        }
    }

    /// Sends a message: builds the prompt, calls the provider once and
    /// appends the user and model turns to the conversation.
    ///
    /// Nothing is persisted when the provider call fails.
    pub async fn send_message(&self, request: &SendMessageRequest) -> Result<SendMessageResponse> {
        let chat_id = request
            .chat_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ParleyError::invalid_request("No active chat"))?;

        let conversation = self
            .conversations
            .get(chat_id)
            .await?
            .ok_or_else(|| ParleyError::not_found("conversation", chat_id))?;

        let agent_id = request.agent_id.as_deref().unwrap_or(DEFAULT_AGENT_ID);
        let mut agents = self.agents.list().await?;
        let agent = match agents.remove(agent_id) {
            Some(agent) => agent,
            None => {
                tracing::warn!(
                    "[ChatService] Unknown agent '{}', using default",
                    agent_id
                );
                agents
                    .remove(DEFAULT_AGENT_ID)
                    .ok_or_else(|| ParleyError::internal("default agent is missing"))?
            }
        };

        let provider_id = match request.model_id.as_deref() {
            Some(model_id) => model_id,
            None => self
                .providers
                .default_id(conversation.model.as_deref())
                .ok_or_else(|| {
                    ParleyError::ProviderUnavailable("no provider is configured".to_string())
                })?,
        };
        let provider = self.providers.get(provider_id)?;

        let prompt = build_prompt(agent.system_instruction(), &request.message);
        let image = request.image.as_deref().filter(|image| !image.is_empty());

        let reply = provider
            .generate(&prompt, image, &conversation.history)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    "[ChatService] {} generation failed for {}: {}",
                    provider_id,
                    chat_id,
                    e
                );
            })?;

        let updated = self
            .conversations
            .append_turns(
                chat_id,
                vec![
                    Turn::user(request.message.clone(), image.is_some()),
                    Turn::model(reply.clone()),
                ],
                Some(provider_id),
            )
            .await?;

        Ok(SendMessageResponse {
            response: reply,
            history: updated.history,
            model: provider_id.to_string(),
            title: updated.title,
        })
    }
}

/// Ids embed their creation time, so the greatest id is the newest.
fn latest_id(conversations: &ConversationMap) -> Option<String> {
    conversations.keys().next_back().cloned()
}
