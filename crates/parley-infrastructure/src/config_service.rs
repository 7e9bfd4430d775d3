//! Configuration service implementation.
//!
//! Builds the `ServerConfig` from an optional `parley.toml` plus environment
//! overrides, and the `SecretConfig` from provider credential variables.

use parley_core::config::{GeminiConfig, OpenAIConfig, SecretConfig, ServerConfig};
use parley_core::error::{ParleyError, Result};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `PARLEY_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "parley.toml";

pub const ENV_CONFIG: &str = "PARLEY_CONFIG";
pub const ENV_HOST: &str = "PARLEY_HOST";
pub const ENV_PORT: &str = "PARLEY_PORT";
pub const ENV_DATA_DIR: &str = "PARLEY_DATA_DIR";
pub const ENV_STATIC_DIR: &str = "PARLEY_STATIC_DIR";

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL_NAME";
pub const ENV_GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL_NAME";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads configuration from files and environment variables.
pub struct ConfigService {
    env: EnvLookup,
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ConfigService {
    /// Uses the process environment.
    pub fn from_env() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    /// Uses a custom variable lookup (for testing).
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            env: Box::new(lookup),
        }
    }

    /// Returns a variable's value, treating blank values as absent.
    fn var(&self, key: &str) -> Option<String> {
        (self.env)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Loads the server configuration.
    ///
    /// The file named by `PARLEY_CONFIG` must exist; the default
    /// `parley.toml` is optional. Environment variables win over the file.
    pub fn load_server_config(&self) -> Result<ServerConfig> {
        let mut config = match self.var(ENV_CONFIG) {
            Some(path) => Self::read_config_file(Path::new(&path))?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::read_config_file(&path)?
                } else {
                    ServerConfig::default()
                }
            }
        };

        if let Some(host) = self.var(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = self.var(ENV_PORT) {
            config.port = port
                .parse()
                .map_err(|e| ParleyError::config(format!("{ENV_PORT}={port}: {e}")))?;
        }
        if let Some(data_dir) = self.var(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(static_dir) = self.var(ENV_STATIC_DIR) {
            config.static_dir = Some(PathBuf::from(static_dir));
        }

        Ok(config)
    }

    /// Reads a TOML config file.
    pub fn read_config_file(path: &Path) -> Result<ServerConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ParleyError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Collects provider credentials. A provider whose key is missing is
    /// left as `None`; this is never an error.
    pub fn load_secrets(&self) -> SecretConfig {
        let gemini = self.var(ENV_GEMINI_API_KEY).map(|api_key| GeminiConfig {
            api_key,
            model_name: self.var(ENV_GEMINI_MODEL),
            base_url: self.var(ENV_GEMINI_BASE_URL),
        });

        let openai = self.var(ENV_OPENAI_API_KEY).map(|api_key| OpenAIConfig {
            api_key,
            model_name: self.var(ENV_OPENAI_MODEL),
            base_url: self.var(ENV_OPENAI_BASE_URL),
        });

        SecretConfig { gemini, openai }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn service(vars: &[(&str, &str)]) -> ConfigService {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigService::with_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_credentials_disable_providers() {
        let secrets = service(&[]).load_secrets();
        assert!(secrets.is_empty());
    }

    #[test]
    fn test_blank_credential_counts_as_absent() {
        let secrets = service(&[(ENV_GEMINI_API_KEY, "  "), (ENV_OPENAI_API_KEY, "sk-1")])
            .load_secrets();
        assert!(secrets.gemini.is_none());
        let openai = secrets.openai.unwrap();
        assert_eq!(openai.api_key, "sk-1");
        assert!(openai.model_name.is_none());
    }

    #[test]
    fn test_model_override() {
        let secrets = service(&[
            (ENV_GEMINI_API_KEY, "g-key"),
            (ENV_GEMINI_MODEL, "gemini-1.5-pro"),
        ])
        .load_secrets();
        let gemini = secrets.gemini.unwrap();
        assert_eq!(gemini.model_name.as_deref(), Some("gemini-1.5-pro"));
    }

    #[test]
    fn test_config_file_with_env_override() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(&path, "host = \"0.0.0.0\"\nport = 9000\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let config = service(&[(ENV_CONFIG, &path_str), (ENV_PORT, "9100")])
            .load_server_config()
            .unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9100);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = service(&[(ENV_PORT, "not-a-port")])
            .load_server_config()
            .unwrap_err();
        assert!(matches!(err, ParleyError::Config(_)));
    }

    #[test]
    fn test_explicit_missing_config_file_is_error() {
        let err = service(&[(ENV_CONFIG, "/definitely/not/here.toml")])
            .load_server_config()
            .unwrap_err();
        assert!(matches!(err, ParleyError::Config(_)));
    }
}
