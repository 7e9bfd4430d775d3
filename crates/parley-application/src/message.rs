//! Request and response models of the chat use cases.

use parley_core::agent::AgentMap;
use parley_core::conversation::{ConversationMap, Turn};
use parley_interaction::ProviderInfo;
use serde::{Deserialize, Serialize};

/// Reply shown to the user when a send fails.
pub const SEND_FAILURE_MESSAGE: &str = "Sorry, an error occurred while processing your message.";

/// A message sent from the chat UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Active conversation. Required; the UI tracks it client-side.
    #[serde(default)]
    pub chat_id: Option<String>,

    #[serde(default)]
    pub message: String,

    /// Data-URI style image payload.
    #[serde(default)]
    pub image: Option<String>,

    /// Agent whose instruction is applied; `default` when absent or unknown.
    #[serde(default)]
    pub agent_id: Option<String>,

    /// Provider id; the conversation's last provider or the registry default when absent.
    #[serde(default)]
    pub model_id: Option<String>,
}

/// Result of a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageResponse {
    pub response: String,
    pub history: Vec<Turn>,
    pub model: String,
    pub title: String,
}

/// Everything the chat page needs on load.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSnapshot {
    pub current_chat_id: String,
    pub history: Vec<Turn>,
    pub conversations: ConversationMap,
    pub agents: AgentMap,
}

/// Available providers and the one used when a request names none.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderListing {
    pub models: Vec<ProviderInfo>,
    pub default: Option<String>,
}
