//! OpenAIProvider - Direct REST API implementation for OpenAI GPT.
//!
//! Calls the Chat Completions API with one role-tagged message per turn.

use parley_core::config::OpenAIConfig;
use parley_core::conversation::{Role, Turn};
use parley_core::error::{ParleyError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::image::ImagePayload;
use crate::prompt::split_system;

pub const PROVIDER_ID: &str = "openai";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const BASE_URL: &str = "https://api.openai.com/v1";
const COMPLETIONS_PATH: &str = "/chat/completions";

/// Provider that talks to the OpenAI HTTP API.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIProvider {
    /// Creates a new provider with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Builds a provider from configuration with a bounded request time.
    pub fn from_config(config: &OpenAIConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ParleyError::config(format!("Failed to build OpenAI client: {e}")))?;

        let model = config
            .model_name
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

        let mut provider = Self::new(config.api_key.clone(), model);
        provider.client = client;
        if let Some(base_url) = &config.base_url {
            provider = provider.with_base_url(base_url.clone());
        }
        Ok(provider)
    }

    /// Overrides the API root, e.g. `https://api.openai.com/v1`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates a reply for the normalized prompt.
    ///
    /// The image is decoded before anything is sent, so a malformed payload
    /// fails with a decode error and no upstream call.
    pub async fn generate(
        &self,
        prompt: &str,
        image: Option<&str>,
        history: &[Turn],
    ) -> Result<String> {
        let image = image.map(ImagePayload::decode).transpose()?;

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_messages(prompt, image.as_ref(), history),
        };

        self.send_request(&request).await
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, COMPLETIONS_PATH))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                ParleyError::provider(
                    PROVIDER_ID,
                    format!("OpenAI API request failed: {}", err.without_url()),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            ParleyError::provider(PROVIDER_ID, format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

/// Builds the ordered message list for one completion call.
///
/// A leading system segment becomes a `system` message, each history turn
/// becomes one message (`model` is sent as `assistant`), and the new user
/// text comes last, paired with the image when there is one.
pub fn build_messages(
    prompt: &str,
    image: Option<&ImagePayload>,
    history: &[Turn],
) -> Vec<ChatMessage> {
    let (system, user_text) = split_system(prompt);

    let mut messages = Vec::with_capacity(history.len() + 2);
    if let Some(system) = system {
        messages.push(ChatMessage::text("system", system));
    }

    for turn in history {
        let role = match turn.role {
            Role::User => "user",
            Role::Model => "assistant",
        };
        messages.push(ChatMessage::text(role, &turn.parts));
    }

    let content = match image {
        None => MessageContent::Text(user_text.to_string()),
        Some(image) => MessageContent::Parts(vec![
            ContentPart::Text {
                text: user_text.to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.to_data_url(),
                },
            },
        ]),
    };
    messages.push(ChatMessage {
        role: "user".to_string(),
        content,
    });

    messages
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    role: String,
    content: MessageContent,
}

impl ChatMessage {
    fn text(role: &str, text: &str) -> Self {
        Self {
            role: role.to_string(),
            content: MessageContent::Text(text.to_string()),
        }
    }
}

/// Plain string content, or a list of typed parts.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq)]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

// Custom serialization for ContentPart
impl Serialize for ContentPart {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(2))?;

        match self {
            ContentPart::Text { text } => {
                map.serialize_entry("type", "text")?;
                map.serialize_entry("text", text)?;
            }
            ContentPart::ImageUrl { image_url } => {
                map.serialize_entry("type", "image_url")?;
                map.serialize_entry("image_url", image_url)?;
            }
        }

        map.end()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            ParleyError::provider(PROVIDER_ID, "OpenAI API returned no content in the response")
        })
}

fn map_http_error(status: StatusCode, body: String) -> ParleyError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.clone());

    ParleyError::Provider {
        provider: PROVIDER_ID.to_string(),
        message,
        status_code: Some(status.as_u16()),
    }
}
