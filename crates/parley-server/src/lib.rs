//! HTTP front-end for Parley.
//!
//! Serves the chat, conversation, agent and provider routes over a
//! [`ChatService`](parley_application::ChatService) built once at startup.

pub mod app;
pub mod error;
pub mod routes;
pub mod server;

pub use app::AppState;
pub use error::ApiError;
pub use server::{build_router, start_server};
