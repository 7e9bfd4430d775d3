//! Agent creation and update request models.

use serde::{Deserialize, Serialize};

/// Name given to agents created without one.
pub const NEW_AGENT_NAME: &str = "New Agent";

/// Request to create a new agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    /// Display name; defaults to "New Agent" when absent
    #[serde(default)]
    pub name: Option<String>,

    /// System instruction; defaults to empty
    #[serde(default)]
    pub instruction: Option<String>,
}

impl CreateAgentRequest {
    pub fn resolved_name(&self) -> &str {
        self.name.as_deref().unwrap_or(NEW_AGENT_NAME)
    }

    pub fn resolved_instruction(&self) -> &str {
        self.instruction.as_deref().unwrap_or("")
    }
}

/// Request to edit an existing agent. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAgentRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub instruction: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateAgentRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.resolved_name(), NEW_AGENT_NAME);
        assert_eq!(request.resolved_instruction(), "");
    }

    #[test]
    fn test_update_request_partial() {
        let request: UpdateAgentRequest =
            serde_json::from_str(r#"{"instruction":"Be brief."}"#).unwrap();
        assert!(request.name.is_none());
        assert_eq!(request.instruction.as_deref(), Some("Be brief."));
    }
}
