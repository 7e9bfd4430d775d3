//! GeminiProvider - Direct REST API implementation for Gemini.
//!
//! Gemini has no separate system channel in the way prompts are sent here,
//! so the system instruction travels inside the prompt text. Without an
//! image, the prompt and the whole history are flattened into one
//! `Human:` / `Assistant:` transcript. With an image, the history texts, the
//! prompt and the image are sent as an ordered list of parts.

use parley_core::config::GeminiConfig;
use parley_core::conversation::{Role, Turn};
use parley_core::error::{ParleyError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::image::ImagePayload;
use crate::prompt::{SYSTEM_MARKER, split_system};

pub const PROVIDER_ID: &str = "gemini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

const HUMAN_PREFIX: &str = "Human: ";
const ASSISTANT_PREFIX: &str = "Assistant: ";
const ASSISTANT_CUE: &str = "Assistant:";

/// Provider that talks to the Gemini HTTP API.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
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
    pub fn from_config(config: &GeminiConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ParleyError::config(format!("Failed to build Gemini client: {e}")))?;

        let model = config
            .model_name
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let mut provider = Self::new(config.api_key.clone(), model);
        provider.client = client;
        if let Some(base_url) = &config.base_url {
            provider = provider.with_base_url(base_url.clone());
        }
        Ok(provider)
    }

    /// Overrides the endpoint root (proxies, tests).
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
        let request = build_request(prompt, image.as_ref(), history);
        self.send_request(&request).await
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(body)
            .send()
            .await
            .map_err(|err| {
                ParleyError::provider(
                    PROVIDER_ID,
                    format!("Gemini API request failed: {}", err.without_url()),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            ParleyError::provider(PROVIDER_ID, format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

/// Flattens the prompt and history into one transcript.
///
/// ```text
/// System: <instruction>
///
/// Human: <turn>
/// Assistant: <turn>
/// Human: <prompt>
/// Assistant:
/// ```
pub fn build_transcript(prompt: &str, history: &[Turn]) -> String {
    let (system, user_text) = split_system(prompt);

    let mut transcript = String::new();
    if let Some(system) = system {
        transcript.push_str(SYSTEM_MARKER);
        transcript.push_str(system);
        transcript.push_str("\n\n");
    }

    for turn in history {
        let prefix = match turn.role {
            Role::User => HUMAN_PREFIX,
            Role::Model => ASSISTANT_PREFIX,
        };
        transcript.push_str(prefix);
        transcript.push_str(&turn.parts);
        transcript.push('\n');
    }

    transcript.push_str(HUMAN_PREFIX);
    transcript.push_str(user_text);
    transcript.push('\n');
    transcript.push_str(ASSISTANT_CUE);
    transcript
}

/// Builds the request body for one generation call.
pub fn build_request(
    prompt: &str,
    image: Option<&ImagePayload>,
    history: &[Turn],
) -> GenerateContentRequest {
    let parts = match image {
        None => vec![Part::Text {
            text: build_transcript(prompt, history),
        }],
        Some(image) => {
            let mut parts: Vec<Part> = history
                .iter()
                .map(|turn| Part::Text {
                    text: turn.parts.clone(),
                })
                .collect();
            parts.push(Part::Text {
                text: prompt.to_string(),
            });
            parts.push(Part::InlineData {
                inline_data: InlineDataPayload {
                    mime_type: image.mime_type.clone(),
                    data: image.to_base64(),
                },
            });
            parts
        }
    };

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
    }
}

#[derive(Serialize, Debug)]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Debug)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    let text: Option<String> = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        });

    match text {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ParleyError::provider(
            PROVIDER_ID,
            "Gemini API returned no text in the response candidates",
        )),
    }
}

fn map_http_error(status: StatusCode, body: String) -> ParleyError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    ParleyError::Provider {
        provider: PROVIDER_ID.to_string(),
        message,
        status_code: Some(status.as_u16()),
    }
}
