mod bootstrap;

pub use bootstrap::bootstrap;

use parley_application::ChatService;
use std::sync::Arc;

/// State shared by every route handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
}

impl AppState {
    pub fn new(chat_service: ChatService) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
        }
    }
}
