//! Path management for the stored documents.
//!
//! # Directory Structure
//!
//! ```text
//! <data_dir>/
//! ├── agents.json          # agent id -> Agent
//! └── conversations.json   # conversation id -> Conversation
//! ```

use std::path::{Path, PathBuf};

const AGENTS_FILE: &str = "agents.json";
const CONVERSATIONS_FILE: &str = "conversations.json";

/// Resolves the document paths below one data directory.
#[derive(Debug, Clone)]
pub struct ParleyPaths {
    data_dir: PathBuf,
}

impl ParleyPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the agent registry document.
    pub fn agents_file(&self) -> PathBuf {
        self.data_dir.join(AGENTS_FILE)
    }

    /// Path of the conversation store document.
    pub fn conversations_file(&self) -> PathBuf {
        self.data_dir.join(CONVERSATIONS_FILE)
    }

    /// Creates the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}
