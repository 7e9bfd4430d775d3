pub mod config_service;
pub mod json_agent_repository;
pub mod json_conversation_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::json_agent_repository::JsonAgentRepository;
pub use crate::json_conversation_repository::JsonConversationRepository;
pub use crate::paths::ParleyPaths;
