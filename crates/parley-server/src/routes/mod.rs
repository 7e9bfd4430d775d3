mod agents;
mod chat;
mod health;
mod models;

pub use agents::agent_routes;
pub use chat::chat_routes;
pub use health::health_routes;
pub use models::model_routes;
