//! Application layer for Parley.
//!
//! Use cases that coordinate the agent registry, the conversation store and
//! the provider registry.

pub mod chat_service;
pub mod message;

pub use chat_service::ChatService;
pub use message::{
    ChatSnapshot, ProviderListing, SEND_FAILURE_MESSAGE, SendMessageRequest, SendMessageResponse,
};
