//! Image payload decoding.
//!
//! The browser sends images as data-URI style strings
//! (`data:image/png;base64,iVBORw0...`). The header before the comma is
//! optional; everything after it must be standard base64.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use parley_core::error::{ParleyError, Result};

const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// A decoded image ready to be attached to a provider request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    /// Decodes a data-URI style payload.
    ///
    /// Fails with `ParleyError::Decode` when the base64 body is malformed or
    /// empty.
    pub fn decode(payload: &str) -> Result<Self> {
        let (header, body) = match payload.split_once(',') {
            Some((header, body)) => (Some(header), body),
            None => (None, payload),
        };

        let body: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = BASE64_STANDARD
            .decode(body.as_bytes())
            .map_err(|e| ParleyError::decode(format!("invalid base64 image data: {e}")))?;
        if bytes.is_empty() {
            return Err(ParleyError::decode("image payload is empty"));
        }

        let mime_type = header
            .and_then(mime_from_header)
            .or_else(|| sniff_mime_type(&bytes))
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string();

        Ok(Self { mime_type, bytes })
    }

    /// Standard base64 of the image bytes.
    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.bytes)
    }

    /// `data:` URL form accepted by chat-completion APIs.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Extracts `image/png` from `data:image/png;base64`.
fn mime_from_header(header: &str) -> Option<&str> {
    let mime = header
        .trim()
        .strip_prefix("data:")?
        .split(';')
        .next()?
        .trim();
    mime.starts_with("image/").then_some(mime)
}

fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}
