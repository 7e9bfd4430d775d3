//! File-backed document storage.

pub mod atomic_json;

pub use atomic_json::JsonDocument;
