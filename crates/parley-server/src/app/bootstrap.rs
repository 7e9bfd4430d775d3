use parley_application::ChatService;
use parley_core::config::{SecretConfig, ServerConfig};
use parley_core::error::{ParleyError, Result};
use parley_infrastructure::ParleyPaths;
use parley_infrastructure::config_service::{ENV_GEMINI_API_KEY, ENV_OPENAI_API_KEY};
use parley_interaction::ProviderRegistry;
use std::time::Duration;

use super::AppState;

/// Builds the application state from the loaded configuration.
///
/// Creates the data directory when missing and registers one provider per
/// credential found. Missing credentials are logged, not fatal.
pub fn bootstrap(config: &ServerConfig, secrets: &SecretConfig) -> Result<AppState> {
    let paths = ParleyPaths::new(&config.data_dir);
    paths.ensure_data_dir().map_err(|e| {
        ParleyError::io(format!(
            "Failed to create data directory {}: {}",
            paths.data_dir().display(),
            e
        ))
    })?;
    tracing::info!("[Bootstrap] Data directory: {}", paths.data_dir().display());

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let providers = ProviderRegistry::from_secrets(secrets, timeout)?;

    if providers.is_empty() {
        tracing::warn!(
            "[Bootstrap] No provider credentials found; set {} or {} to send messages",
            ENV_GEMINI_API_KEY,
            ENV_OPENAI_API_KEY
        );
    }
    for info in providers.list() {
        tracing::info!("[Bootstrap] Provider available: {} ({})", info.name, info.id);
    }

    Ok(AppState::new(ChatService::from_paths(&paths, providers)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::config::GeminiConfig;
    use tempfile::TempDir;

    #[test]
    fn test_bootstrap_creates_data_dir_and_registers_providers() {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig {
            data_dir: temp_dir.path().join("nested").join("data"),
            ..ServerConfig::default()
        };
        let secrets = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "key".into(),
                model_name: None,
                base_url: None,
            }),
            openai: None,
        };

        let state = bootstrap(&config, &secrets).unwrap();
        assert!(config.data_dir.is_dir());

        let listing = state.chat_service.list_providers();
        assert_eq!(listing.models.len(), 1);
        assert_eq!(listing.default.as_deref(), Some("gemini"));
    }
}
