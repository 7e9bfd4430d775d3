//! Provider registry.
//!
//! Built once at startup from the credentials that are present. A provider
//! without a credential is absent, and looking it up reports it as
//! unavailable.

use parley_core::config::SecretConfig;
use parley_core::error::{ParleyError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::providers::{GeminiProvider, OpenAIProvider, Provider, gemini};

/// Entry of the provider listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
}

/// Mapping of provider id to configured provider.
#[derive(Clone, Debug, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Provider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every provider that has a credential.
    pub fn from_secrets(secrets: &SecretConfig, timeout: Duration) -> Result<Self> {
        let mut registry = Self::new();

        if let Some(config) = &secrets.gemini {
            registry.register(GeminiProvider::from_config(config, timeout)?);
        }
        if let Some(config) = &secrets.openai {
            registry.register(OpenAIProvider::from_config(config, timeout)?);
        }

        Ok(registry)
    }

    /// Adds or replaces a provider under its id.
    pub fn register(&mut self, provider: impl Into<Provider>) {
        let provider = provider.into();
        self.providers.insert(provider.id().to_string(), provider);
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Looks up a provider by id.
    pub fn get(&self, provider_id: &str) -> Result<&Provider> {
        self.providers
            .get(provider_id)
            .ok_or_else(|| ParleyError::ProviderUnavailable(provider_id.to_string()))
    }

    /// Lists the available providers.
    pub fn list(&self) -> Vec<ProviderInfo> {
        self.providers
            .values()
            .map(|provider| ProviderInfo {
                id: provider.id().to_string(),
                name: provider.display_name(),
            })
            .collect()
    }

    /// Picks the provider to use when a request names none.
    ///
    /// `preferred` (typically the provider last used by the conversation) wins
    /// when it is available; otherwise Gemini, otherwise the first one.
    pub fn default_id(&self, preferred: Option<&str>) -> Option<&str> {
        if let Some(preferred) = preferred
            && let Some((id, _)) = self.providers.get_key_value(preferred)
        {
            return Some(id.as_str());
        }
        if let Some((id, _)) = self.providers.get_key_value(gemini::PROVIDER_ID) {
            return Some(id.as_str());
        }
        self.providers.keys().next().map(String::as_str)
    }
}
