//! Conversation domain module.
//!
//! A conversation is a persisted chat session: an ordered, append-only
//! history of turns plus a title and metadata.

mod model;
mod repository;
mod title;

pub use model::{Conversation, ConversationMap, Role, Turn, DEFAULT_CONVERSATION_TITLE};
pub use repository::ConversationRepository;
pub use title::derive_title;
