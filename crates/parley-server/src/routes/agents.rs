//! Agent profile routes.

use crate::ApiError;
use crate::app::AppState;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use parley_core::agent::{AgentMap, CreateAgentRequest, UpdateAgentRequest};
use serde_json::{Value, json};

pub fn agent_routes() -> Router<AppState> {
    Router::new()
        .route("/agents", get(list_agents))
        .route("/agent/new", post(create_agent))
        .route("/agent/edit/{agent_id}", post(edit_agent))
        .route("/agent/delete/{agent_id}", post(delete_agent))
}

async fn list_agents(State(state): State<AppState>) -> Result<Json<AgentMap>, ApiError> {
    Ok(Json(state.chat_service.list_agents().await?))
}

async fn create_agent(
    State(state): State<AppState>,
    payload: Result<Json<CreateAgentRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let agent_id = state.chat_service.create_agent(&req).await?;
    Ok(Json(json!({ "success": true, "agent_id": agent_id })))
}

async fn edit_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    payload: Result<Json<UpdateAgentRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    state.chat_service.update_agent(&agent_id, &req).await?;
    Ok(Json(json!({ "success": true })))
}

/// `default` answers 403; unknown ids answer 404.
async fn delete_agent(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.chat_service.delete_agent(&agent_id).await?;
    Ok(Json(json!({ "success": true })))
}
