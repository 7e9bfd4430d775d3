//! Provider adapters for Parley.
//!
//! Turns a normalized prompt, the conversation history and an optional image
//! into each vendor's wire format, and extracts the reply text.

pub mod image;
pub mod prompt;
pub mod providers;
pub mod registry;

pub use image::ImagePayload;
pub use prompt::{SYSTEM_MARKER, build_prompt, split_system};
pub use providers::{GeminiProvider, OpenAIProvider, Provider};
pub use registry::{ProviderInfo, ProviderRegistry};
