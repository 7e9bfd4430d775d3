//! Conversation and message routes.

use crate::ApiError;
use crate::app::AppState;
use crate::error::status_for;
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parley_application::{ChatSnapshot, SEND_FAILURE_MESSAGE, SendMessageRequest};
use parley_core::conversation::ConversationMap;
use parley_core::error::ParleyError;
use serde::Deserialize;
use serde_json::{Value, json};

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/state", get(get_state))
        .route("/chats", get(list_chats))
        .route("/new_chat", post(new_chat))
        .route("/switch_chat/{chat_id}", get(switch_chat))
        .route("/rename_chat/{chat_id}", post(rename_chat))
        .route("/delete_chat/{chat_id}", post(delete_chat))
        .route("/send_message", post(send_message))
}

#[derive(Debug, Deserialize)]
struct StateQuery {
    current: Option<String>,
}

/// Page state on load. Creates the first conversation on an empty store.
async fn get_state(
    State(state): State<AppState>,
    Query(query): Query<StateQuery>,
) -> Result<Json<ChatSnapshot>, ApiError> {
    let snapshot = state
        .chat_service
        .snapshot(query.current.as_deref())
        .await?;
    Ok(Json(snapshot))
}

async fn list_chats(State(state): State<AppState>) -> Result<Json<ConversationMap>, ApiError> {
    Ok(Json(state.chat_service.list_conversations().await?))
}

async fn new_chat(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let chat_id = state.chat_service.create_conversation().await?;
    Ok(Json(json!({ "success": true, "chat_id": chat_id })))
}

async fn switch_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let history = state.chat_service.switch_conversation(&chat_id).await?;
    Ok(Json(json!({ "success": true, "history": history })))
}

#[derive(Debug, Deserialize)]
struct RenameRequest {
    title: String,
}

async fn rename_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    payload: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    state
        .chat_service
        .rename_conversation(&chat_id, &req.title)
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn delete_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let next_chat_id = state.chat_service.delete_conversation(&chat_id).await?;
    Ok(Json(json!({ "success": true, "next_chat_id": next_chat_id })))
}

/// Sends a message. Failures answer with the fallback reply plus the error
/// detail, never with a partial history.
async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    let result = match payload {
        Ok(Json(req)) => state.chat_service.send_message(&req).await,
        Err(rejection) => Err(ParleyError::invalid_request(rejection.body_text())),
    };

    match result {
        Ok(response) => Json(response).into_response(),
        Err(err) => {
            let status = status_for(&err);
            if status == StatusCode::INTERNAL_SERVER_ERROR && !err.is_provider() {
                tracing::error!("[Api] send_message failed: {}", err);
            }
            (
                status,
                Json(json!({
                    "response": SEND_FAILURE_MESSAGE,
                    "error": err.to_string(),
                })),
            )
                .into_response()
        }
    }
}
