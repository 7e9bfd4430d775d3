use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use parley_application::{ChatService, SEND_FAILURE_MESSAGE};
use parley_infrastructure::ParleyPaths;
use parley_interaction::{GeminiProvider, ProviderRegistry};
use parley_server::{AppState, build_router};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(temp_dir: &TempDir, providers: ProviderRegistry) -> Router {
    let service = ChatService::from_paths(&ParleyPaths::new(temp_dir.path()), providers);
    build_router(AppState::new(service), None)
}

async fn gemini_registry(reply: &str) -> (MockServer, ProviderRegistry) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": reply}]}}]
        })))
        .mount(&server)
        .await;

    let mut registry = ProviderRegistry::new();
    registry.register(GeminiProvider::new("key", "gemini-test").with_base_url(server.uri()));
    (server, registry)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(resp).await
}

async fn post(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(resp).await
}

async fn post_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let resp = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    read(resp).await
}

async fn read(resp: axum::response::Response) -> (StatusCode, Value) {
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir, ProviderRegistry::new());

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_state_bootstraps_conversation() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir, ProviderRegistry::new());

    let (status, body) = get(&app, "/state").await;
    assert_eq!(status, StatusCode::OK);
    let current = body["current_chat_id"].as_str().unwrap();
    assert_eq!(body["conversations"][current]["title"], "New Conversation");
    assert_eq!(body["history"], json!([]));
    assert_eq!(body["agents"]["default"]["name"], "Default");
}

#[tokio::test]
async fn test_conversation_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir, ProviderRegistry::new());

    let (status, body) = post(&app, "/new_chat", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let chat_id = body["chat_id"].as_str().unwrap().to_string();

    let (status, body) = get(&app, &format!("/switch_chat/{chat_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history"], json!([]));

    let (status, _) = post(
        &app,
        &format!("/rename_chat/{chat_id}"),
        json!({"title": "Planning"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, chats) = get(&app, "/chats").await;
    assert_eq!(chats[&chat_id]["title"], "Planning");

    let (status, body) = post(&app, &format!("/delete_chat/{chat_id}"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next_chat_id"], Value::Null);
}

#[tokio::test]
async fn test_unknown_conversation_is_404() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir, ProviderRegistry::new());

    let (status, body) = get(&app, "/switch_chat/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = post(&app, "/rename_chat/nope", json!({"title": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, "/delete_chat/nope", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_agent_routes() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir, ProviderRegistry::new());

    let (status, body) = post(
        &app,
        "/agent/new",
        json!({"name": "Translator", "instruction": "Translate to English."}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let agent_id = body["agent_id"].as_str().unwrap().to_string();

    let (status, _) = post(
        &app,
        &format!("/agent/edit/{agent_id}"),
        json!({"name": "Translator EN"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, agents) = get(&app, "/agents").await;
    assert_eq!(agents[&agent_id]["name"], "Translator EN");
    assert_eq!(agents[&agent_id]["instruction"], "Translate to English.");

    let (status, _) = post(&app, "/agent/delete/default", json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post(&app, &format!("/agent/delete/{agent_id}"), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(&app, &format!("/agent/delete/{agent_id}"), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, "/agent/edit/ghost", json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_models_lists_configured_providers() {
    let temp_dir = TempDir::new().unwrap();
    let (_server, registry) = gemini_registry("unused").await;
    let app = app(&temp_dir, registry);

    let (status, body) = get(&app, "/models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "models": [{"id": "gemini", "name": "Gemini (gemini-test)"}],
            "default": "gemini"
        })
    );
}

#[tokio::test]
async fn test_send_message_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let (_server, registry) = gemini_registry("Four.").await;
    let app = app(&temp_dir, registry);

    let (_, body) = post(&app, "/new_chat", json!({})).await;
    let chat_id = body["chat_id"].as_str().unwrap().to_string();

    let (status, body) = post(
        &app,
        "/send_message",
        json!({"chat_id": chat_id, "message": "What is two plus two?"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Four.");
    assert_eq!(body["model"], "gemini");
    assert_eq!(body["title"], "What is two plus...");
    assert_eq!(
        body["history"],
        json!([
            {"role": "user", "parts": "What is two plus two?"},
            {"role": "model", "parts": "Four."}
        ])
    );
}

#[tokio::test]
async fn test_send_message_failures_carry_fallback() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir, ProviderRegistry::new());

    let (status, body) = post(&app, "/send_message", json!({"message": "hi"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["response"], SEND_FAILURE_MESSAGE);
    assert!(body["error"].as_str().unwrap().contains("No active chat"));

    let (status, body) = post(
        &app,
        "/send_message",
        json!({"chat_id": "missing", "message": "hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["response"], SEND_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_send_message_upstream_error_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"message": "The model is overloaded.", "status": "UNAVAILABLE"}
        })))
        .mount(&server)
        .await;
    let mut registry = ProviderRegistry::new();
    registry.register(GeminiProvider::new("key", "gemini-test").with_base_url(server.uri()));

    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir, registry);
    let (_, body) = post(&app, "/new_chat", json!({})).await;
    let chat_id = body["chat_id"].as_str().unwrap().to_string();

    let (status, body) = post(
        &app,
        "/send_message",
        json!({"chat_id": chat_id, "message": "hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["response"], SEND_FAILURE_MESSAGE);
    assert!(body["error"].as_str().unwrap().contains("The model is overloaded."));

    let (_, body) = get(&app, &format!("/switch_chat/{chat_id}")).await;
    assert_eq!(body["history"], json!([]));
}

#[tokio::test]
async fn test_send_message_transport_error_hides_api_key() {
    let mut registry = ProviderRegistry::new();
    registry.register(
        GeminiProvider::new("SECRET-KEY-123", "gemini-test").with_base_url("http://127.0.0.1:1"),
    );

    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir, registry);
    let (_, body) = post(&app, "/new_chat", json!({})).await;
    let chat_id = body["chat_id"].as_str().unwrap().to_string();

    let (status, body) = post(
        &app,
        "/send_message",
        json!({"chat_id": chat_id, "message": "hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["response"], SEND_FAILURE_MESSAGE);
    assert!(!body.to_string().contains("SECRET-KEY-123"));
}

#[tokio::test]
async fn test_malformed_send_body_gets_fallback_object() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir, ProviderRegistry::new());

    let (status, body) =
        post_raw(&app, "/send_message", Some("application/json"), "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["response"], SEND_FAILURE_MESSAGE);
    assert!(body["error"].is_string());

    let (status, body) = post_raw(&app, "/send_message", None, r#"{"message":"hi"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["response"], SEND_FAILURE_MESSAGE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_bodies_get_structured_errors() {
    let temp_dir = TempDir::new().unwrap();
    let app = app(&temp_dir, ProviderRegistry::new());
    let (_, body) = post(&app, "/new_chat", json!({})).await;
    let chat_id = body["chat_id"].as_str().unwrap().to_string();

    // Missing title.
    let (status, body) = post(&app, &format!("/rename_chat/{chat_id}"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let (status, body) = post_raw(&app, "/agent/new", Some("application/json"), "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = post_raw(&app, "/agent/edit/default", None, r#"{"name":"x"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
