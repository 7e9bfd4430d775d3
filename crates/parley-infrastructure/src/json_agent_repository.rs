//! JSON file based AgentRepository implementation.

use crate::paths::ParleyPaths;
use crate::storage::JsonDocument;
use async_trait::async_trait;
use parley_core::agent::{Agent, AgentMap, AgentRepository, DEFAULT_AGENT_ID};
use parley_core::error::{ParleyError, Result};
use parley_core::id::generate_id;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tokio::task;

/// Agent registry stored as a single `agents.json` document.
///
/// The document maps agent id to agent. When the file does not exist it is
/// created holding only the `default` agent.
pub struct JsonAgentRepository {
    document: JsonDocument<AgentMap>,
    /// Serializes load-mutate-save sequences within this process.
    lock: Mutex<()>,
}

impl JsonAgentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            document: JsonDocument::new(path),
            lock: Mutex::new(()),
        }
    }

    pub fn from_paths(paths: &ParleyPaths) -> Self {
        Self::new(paths.agents_file())
    }

    async fn load(&self) -> Result<AgentMap> {
        let _guard = self.lock.lock().await;
        let document = self.document.clone();

        task::spawn_blocking(move || document.load(Agent::initial_registry()))
            .await
            .map_err(|e| ParleyError::io(format!("Failed to spawn blocking task: {}", e)))?
    }

    async fn modify<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut AgentMap) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let _guard = self.lock.lock().await;
        let document = self.document.clone();

        task::spawn_blocking(move || document.update(Agent::initial_registry(), f))
            .await
            .map_err(|e| ParleyError::io(format!("Failed to spawn blocking task: {}", e)))?
    }
}

#[async_trait]
impl AgentRepository for JsonAgentRepository {
    async fn list(&self) -> Result<AgentMap> {
        let mut agents = self.load().await?;
        agents
            .entry(DEFAULT_AGENT_ID.to_string())
            .or_insert_with(Agent::default_profile);
        Ok(agents)
    }

    async fn get(&self, agent_id: &str) -> Result<Option<Agent>> {
        let mut agents = self.list().await?;
        Ok(agents.remove(agent_id))
    }

    async fn create(&self, name: &str, instruction: &str) -> Result<String> {
        let agent_id = generate_id();
        let agent = Agent::new(name, instruction);

        let key = agent_id.clone();
        self.modify(move |agents| {
            agents.insert(key, agent);
            Ok(())
        })
        .await?;

        tracing::debug!("[AgentRepository] Created agent {}", agent_id);
        Ok(agent_id)
    }

    async fn update(
        &self,
        agent_id: &str,
        name: Option<&str>,
        instruction: Option<&str>,
    ) -> Result<bool> {
        let agent_id = agent_id.to_string();
        let name = name.map(str::to_string);
        let instruction = instruction.map(str::to_string);

        self.modify(move |agents| {
            if agent_id == DEFAULT_AGENT_ID {
                agents
                    .entry(agent_id.clone())
                    .or_insert_with(Agent::default_profile);
            }

            let Some(agent) = agents.get_mut(&agent_id) else {
                return Ok(false);
            };
            if let Some(name) = name {
                agent.name = name;
            }
            if let Some(instruction) = instruction {
                agent.instruction = instruction;
            }
            Ok(true)
        })
        .await
    }

    async fn delete(&self, agent_id: &str) -> Result<bool> {
        if agent_id == DEFAULT_AGENT_ID {
            return Ok(false);
        }

        let agent_id = agent_id.to_string();
        self.modify(move |agents| Ok(agents.remove(&agent_id).is_some()))
            .await
    }
}
