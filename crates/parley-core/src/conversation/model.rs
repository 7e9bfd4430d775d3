//! Conversation domain models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::title::derive_title;
use crate::error::{ParleyError, Result};
use crate::id::timestamp_now;

/// Title carried by a conversation until its first message is sent.
pub const DEFAULT_CONVERSATION_TITLE: &str = "New Conversation";

/// Mapping of conversation id to conversation, the shape of the stored document.
pub type ConversationMap = BTreeMap<String, Conversation>;

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the person using the UI.
    User,
    /// Reply produced by the provider.
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One message of a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    /// Message text.
    pub parts: String,
    /// Whether an image accompanied the message (user turns only).
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_image: bool,
}

impl Turn {
    pub fn user(text: impl Into<String>, has_image: bool) -> Self {
        Self {
            role: Role::User,
            parts: text.into(),
            has_image,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: text.into(),
            has_image: false,
        }
    }
}

/// A persisted chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub title: String,
    #[serde(default)]
    pub history: Vec<Turn>,
    pub created_at: String,
    /// Provider id used for the most recent reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Creates an empty conversation carrying the default title.
    pub fn new() -> Self {
        Self {
            title: DEFAULT_CONVERSATION_TITLE.to_string(),
            history: Vec::new(),
            created_at: timestamp_now(),
            model: None,
        }
    }

    /// Appends one turn, keeping the strict user/model alternation.
    ///
    /// The first user turn appended to an empty history also assigns the
    /// title derived from its text. This is the only place a title is set
    /// automatically, so it happens at most once per conversation.
    pub fn append_turn(&mut self, turn: Turn) -> Result<()> {
        let expected = match self.history.last() {
            None | Some(Turn { role: Role::Model, .. }) => Role::User,
            Some(Turn { role: Role::User, .. }) => Role::Model,
        };
        if turn.role != expected {
            return Err(ParleyError::invalid_request(format!(
                "expected a {} turn, got a {} turn",
                expected.as_str(),
                turn.role.as_str()
            )));
        }

        if self.history.is_empty()
            && let Some(title) = derive_title(&turn.parts)
        {
            self.title = title;
        }

        self.history.push(turn);
        Ok(())
    }
}
