//! Provider adapters.
//!
//! Every supported vendor is one variant of [`Provider`]; callers only ever
//! use [`Provider::generate`]. Adding a vendor means adding a variant here.

pub mod gemini;
pub mod openai;

use parley_core::conversation::Turn;
use parley_core::error::Result;

pub use gemini::GeminiProvider;
pub use openai::OpenAIProvider;

/// A configured LLM provider.
#[derive(Clone, Debug)]
pub enum Provider {
    /// Multimodal generation API with a single-shot context.
    Gemini(GeminiProvider),
    /// Structured chat-completion API.
    OpenAI(OpenAIProvider),
}

impl Provider {
    /// Short id used to select the provider in requests.
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Gemini(_) => gemini::PROVIDER_ID,
            Provider::OpenAI(_) => openai::PROVIDER_ID,
        }
    }

    /// Human-readable name for provider pickers.
    pub fn display_name(&self) -> String {
        match self {
            Provider::Gemini(p) => format!("Gemini ({})", p.model()),
            Provider::OpenAI(p) => format!("OpenAI ({})", p.model()),
        }
    }

    /// Generates a reply for `prompt`, given the prior `history`.
    ///
    /// `image` is an optional data-URI style payload. One attempt is made;
    /// failures surface as `ParleyError::Provider` (upstream) or
    /// `ParleyError::Decode` (image).
    pub async fn generate(
        &self,
        prompt: &str,
        image: Option<&str>,
        history: &[Turn],
    ) -> Result<String> {
        match self {
            Provider::Gemini(p) => p.generate(prompt, image, history).await,
            Provider::OpenAI(p) => p.generate(prompt, image, history).await,
        }
    }
}

impl From<GeminiProvider> for Provider {
    fn from(provider: GeminiProvider) -> Self {
        Provider::Gemini(provider)
    }
}

impl From<OpenAIProvider> for Provider {
    fn from(provider: OpenAIProvider) -> Self {
        Provider::OpenAI(provider)
    }
}
