use crate::app::AppState;
use axum::{Json, Router, extract::State, routing::get};
use parley_application::ProviderListing;

pub fn model_routes() -> Router<AppState> {
    Router::new().route("/models", get(list_models))
}

/// Lists the providers that have a credential, plus the default one.
async fn list_models(State(state): State<AppState>) -> Json<ProviderListing> {
    Json(state.chat_service.list_providers())
}
