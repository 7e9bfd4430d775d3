//! Agent repository trait.
//!
//! Defines the interface for agent registry persistence.

use super::model::{Agent, AgentMap};
use crate::error::Result;

/// An abstract registry of agent profiles.
///
/// # Implementation Notes
///
/// Implementations must:
/// - always resolve the `default` agent, even when the stored document is empty
/// - refuse to delete the `default` agent
/// - serialize each load-mutate-save sequence so concurrent callers do not
///   lose updates
#[async_trait::async_trait]
pub trait AgentRepository: Send + Sync {
    /// Returns every agent keyed by id, `default` included.
    async fn list(&self) -> Result<AgentMap>;

    /// Finds an agent by id.
    async fn get(&self, agent_id: &str) -> Result<Option<Agent>>;

    /// Creates a new agent and returns its generated id.
    async fn create(&self, name: &str, instruction: &str) -> Result<String>;

    /// Updates name and/or instruction.
    ///
    /// Returns `false` if the id is unknown.
    async fn update(
        &self,
        agent_id: &str,
        name: Option<&str>,
        instruction: Option<&str>,
    ) -> Result<bool>;

    /// Deletes an agent.
    ///
    /// Returns `false` if the id is unknown or is the reserved `default` id.
    async fn delete(&self, agent_id: &str) -> Result<bool>;
}
