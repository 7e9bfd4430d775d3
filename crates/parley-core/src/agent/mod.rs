//! Agent domain module.
//!
//! An agent is a named system-instruction profile applied to the prompts of
//! a conversation.
//!
//! # Module Structure
//!
//! - `model`: the `Agent` profile and the reserved `default` identity
//! - `repository`: repository trait for agent persistence
//! - `request`: create/update request models

mod model;
mod repository;
pub mod request;

pub use model::{Agent, AgentMap, DEFAULT_AGENT_ID, DEFAULT_AGENT_NAME};
pub use repository::AgentRepository;
pub use request::{CreateAgentRequest, UpdateAgentRequest};
