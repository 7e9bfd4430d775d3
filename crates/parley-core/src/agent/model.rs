//! Agent domain model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::id::timestamp_now;

/// Identifier of the permanent fallback agent.
pub const DEFAULT_AGENT_ID: &str = "default";

/// Display name of the permanent fallback agent.
pub const DEFAULT_AGENT_NAME: &str = "Default";

/// Mapping of agent id to agent, the shape of the stored registry document.
pub type AgentMap = BTreeMap<String, Agent>;

/// A named system-instruction profile.
///
/// The id is the key in the registry document and is not repeated inside
/// the stored value.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    /// Display name of the agent
    pub name: String,
    /// System instruction prepended to prompts (may be empty)
    #[serde(default)]
    pub instruction: String,
    /// Creation time (RFC 3339)
    pub created_at: String,
}

impl Agent {
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            created_at: timestamp_now(),
        }
    }

    /// The built-in profile with an empty instruction.
    pub fn default_profile() -> Self {
        Self::new(DEFAULT_AGENT_NAME, "")
    }

    /// Returns the instruction when it carries any text.
    pub fn system_instruction(&self) -> Option<&str> {
        let trimmed = self.instruction.trim();
        (!trimmed.is_empty()).then_some(self.instruction.as_str())
    }

    /// Builds the initial registry document holding only the default agent.
    pub fn initial_registry() -> AgentMap {
        let mut agents = AgentMap::new();
        agents.insert(DEFAULT_AGENT_ID.to_string(), Self::default_profile());
        agents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_has_no_instruction() {
        let agent = Agent::default_profile();
        assert_eq!(agent.name, DEFAULT_AGENT_NAME);
        assert!(agent.system_instruction().is_none());
    }

    #[test]
    fn test_whitespace_instruction_is_ignored() {
        let agent = Agent::new("Blank", "   \n");
        assert!(agent.system_instruction().is_none());

        let agent = Agent::new("Poet", "Answer in verse.");
        assert_eq!(agent.system_instruction(), Some("Answer in verse."));
    }

    #[test]
    fn test_initial_registry_contains_default() {
        let agents = Agent::initial_registry();
        assert_eq!(agents.len(), 1);
        assert!(agents.contains_key(DEFAULT_AGENT_ID));
    }
}
