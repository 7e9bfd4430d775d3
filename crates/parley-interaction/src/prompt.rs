//! Normalized prompt construction.
//!
//! The application hands every provider one prompt string. When the agent
//! carries a system instruction the prompt starts with the system marker:
//!
//! ```text
//! System: <instruction>
//!
//! <user message>
//! ```
//!
//! Providers with a dedicated system channel split it back apart.

/// Marker that opens a system instruction segment.
pub const SYSTEM_MARKER: &str = "System: ";

const SEGMENT_SEPARATOR: &str = "\n\n";

/// Builds the normalized prompt for a message and optional instruction.
pub fn build_prompt(system_instruction: Option<&str>, message: &str) -> String {
    match system_instruction {
        Some(instruction) => {
            format!("{SYSTEM_MARKER}{instruction}{SEGMENT_SEPARATOR}{message}")
        }
        None => message.to_string(),
    }
}

/// Splits a normalized prompt into `(system instruction, user text)`.
///
/// A prompt without the marker is all user text. A marker without a
/// separator is all system text.
pub fn split_system(prompt: &str) -> (Option<&str>, &str) {
    let Some(rest) = prompt.strip_prefix(SYSTEM_MARKER) else {
        return (None, prompt);
    };

    match rest.split_once(SEGMENT_SEPARATOR) {
        Some((system, user)) => (Some(system), user),
        None => (Some(rest), ""),
    }
}
