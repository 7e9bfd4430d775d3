pub mod agent;
pub mod config;
pub mod conversation;
pub mod error;
pub mod id;

// Re-export common error type
pub use error::{ParleyError, Result};
