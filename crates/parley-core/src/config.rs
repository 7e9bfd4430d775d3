//! Configuration domain models.
//!
//! `ServerConfig` describes where the server listens and where it keeps its
//! documents; `SecretConfig` carries the provider credentials. Both are built
//! once at startup and handed to the components that need them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Server settings, read from `parley.toml` and overridden by the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding `agents.json` and `conversations.json`.
    pub data_dir: PathBuf,
    /// Optional directory of browser assets served at `/`.
    pub static_dir: Option<PathBuf>,
    /// Upper bound on a single provider call.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            static_dir: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Gemini API configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
}

/// OpenAI API configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model_name: Option<String>,
    pub base_url: Option<String>,
}

/// Provider credentials found at startup.
///
/// A provider without a credential is `None` and is simply left out of the
/// provider registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    pub gemini: Option<GeminiConfig>,
    pub openai: Option<OpenAIConfig>,
}

impl SecretConfig {
    pub fn is_empty(&self) -> bool {
        self.gemini.is_none() && self.openai.is_none()
    }
}
