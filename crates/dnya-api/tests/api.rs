//! Router tests driven through `tower::ServiceExt::oneshot` against a
//! temporary SQLite database and stub completion providers.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use dnya_api::http::router::build_router;
use dnya_api::state::{AppState, Backends};
use dnya_core::llm::box_provider::BoxLlmProvider;
use dnya_core::llm::provider::LlmProvider;
use dnya_infra::sqlite::pool::{DatabasePool, database_url_for};
use dnya_types::config::DnyaConfig;
use dnya_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, Usage,
};

/// Answers every request with a fixed reply, or fails when `reply` is `None`.
struct StubProvider {
    reply: Option<&'static str>,
    capabilities: ProviderCapabilities,
}

impl StubProvider {
    fn boxed(reply: Option<&'static str>) -> BoxLlmProvider {
        BoxLlmProvider::new(Self {
            reply,
            capabilities: ProviderCapabilities {
                max_context_tokens: 8_192,
                max_output_tokens: 1_024,
            },
        })
    }
}

impl LlmProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let content = self.reply.ok_or_else(|| LlmError::Provider {
            message: "stub is down".to_string(),
        })?;
        Ok(CompletionResponse {
            id: "stub-1".to_string(),
            content: content.to_string(),
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }
}

async fn make_app(primary: Option<&'static str>, fallback: Option<&'static str>) -> Router {
    let dir = tempfile::tempdir().unwrap();
    let pool = DatabasePool::new(&database_url_for(dir.path())).await.unwrap();
    std::mem::forget(dir);

    let mut config = DnyaConfig::default();
    config.server.web_dir = Some("/nonexistent/dnya-web".to_string());

    let state = AppState::from_parts(
        config,
        pool,
        &SecretString::from("test-secret".to_string()),
        Backends {
            primary: StubProvider::boxed(primary),
            fallback: StubProvider::boxed(fallback),
            retrieval: None,
        },
    )
    .unwrap();
    build_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with_auth(app, method, uri, body, None).await
}

async fn send_with_auth(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn credentials(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = make_app(Some("hi"), Some("hi")).await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_signup_is_unique_per_email() {
    let app = make_app(Some("hi"), Some("hi")).await;

    let (status, body) =
        send(&app, "POST", "/api/signup", Some(credentials("a@x.com", "pw1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert!(body["token"].as_str().is_some());
    assert!(body["userId"].as_str().is_some());

    let (status, body) =
        send(&app, "POST", "/api/signup", Some(credentials("a@x.com", "pw2"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "User already exists" }));
}

#[tokio::test]
async fn test_signup_requires_email_and_password() {
    let app = make_app(Some("hi"), Some("hi")).await;
    let (status, body) =
        send(&app, "POST", "/api/signup", Some(json!({ "email": "a@x.com" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and password are required");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = make_app(Some("hi"), Some("hi")).await;
    send(&app, "POST", "/api/signup", Some(credentials("a@x.com", "pw1"))).await;

    let (wrong_pw_status, wrong_pw) =
        send(&app, "POST", "/api/login", Some(credentials("a@x.com", "nope"))).await;
    let (unknown_status, unknown) =
        send(&app, "POST", "/api/login", Some(credentials("b@x.com", "pw1"))).await;

    assert_eq!(wrong_pw_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_pw, unknown);
    assert_eq!(wrong_pw, json!({ "message": "Invalid credentials" }));
}

#[tokio::test]
async fn test_login_token_resolves_to_user() {
    let app = make_app(Some("hi"), Some("hi")).await;
    let (_, signup) = send(&app, "POST", "/api/signup", Some(credentials("a@x.com", "pw1"))).await;

    let (status, login) =
        send(&app, "POST", "/api/login", Some(credentials("a@x.com", "pw1"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["user"]["userId"], signup["userId"]);
    assert_eq!(login["user"]["email"], "a@x.com");

    let token = login["token"].as_str().unwrap();
    let (status, me) = send_with_auth(&app, "GET", "/api/me", None, Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["userId"], signup["userId"]);
}

#[tokio::test]
async fn test_me_rejects_bad_token() {
    let app = make_app(Some("hi"), Some("hi")).await;
    let (status, _) = send_with_auth(&app, "GET", "/api/me", None, Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_get_or_create_and_consent() {
    let app = make_app(Some("hi"), Some("hi")).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "userId": "u1", "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["hasConsented"], false);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/users/consent",
        Some(json!({ "userId": "u1", "hasConsented": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["hasConsented"], true);

    // A second create returns the stored record unchanged.
    let (_, body) = send(&app, "POST", "/api/users", Some(json!({ "userId": "u1" }))).await;
    assert_eq!(body["user"]["hasConsented"], true);
    assert_eq!(body["user"]["email"], "a@x.com");

    let (status, body) = send(&app, "POST", "/api/users", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "User ID is required" }));
}

#[tokio::test]
async fn test_full_turn_persists_both_messages() {
    let app = make_app(Some("hi there"), Some("fallback")).await;

    let (_, signup) = send(&app, "POST", "/api/signup", Some(credentials("a@x.com", "pw1"))).await;
    let (_, login) = send(&app, "POST", "/api/login", Some(credentials("a@x.com", "pw1"))).await;
    assert_eq!(login["user"]["userId"], signup["userId"]);
    let user_id = signup["userId"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/generate-response",
        Some(json!({ "message": "hello", "userId": user_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "hi there");
    assert_eq!(body["userId"], user_id.as_str());
    assert_eq!(body["degraded"], false);

    let (status, body) = send(&app, "GET", &format!("/api/messages/{user_id}/dnya"), None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["senderId"], user_id.as_str());
    assert_eq!(messages[0]["content"], "hello");
    assert_eq!(messages[1]["senderId"], "dnya");
    assert_eq!(messages[1]["content"], "hi there");
}

#[tokio::test]
async fn test_turn_uses_fallback_when_primary_fails() {
    let app = make_app(None, Some("from fallback")).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/generate-response",
        Some(json!({ "message": "hello", "userId": "u1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "from fallback");
    assert_eq!(body["degraded"], true);
}

#[tokio::test]
async fn test_turn_unavailable_when_both_paths_fail() {
    let app = make_app(None, None).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/generate-response",
        Some(json!({ "message": "hello", "userId": "u1" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "AI unavailable");
    assert!(body["details"].as_str().is_some());

    // The inbound message is stored even though no reply was produced.
    let (_, body) = send(&app, "GET", "/api/messages/u1/dnya", None).await;
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_turn_requires_message_and_user() {
    let app = make_app(Some("hi"), Some("hi")).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/generate-response",
        Some(json!({ "userId": "u1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Message and userId are required" }));
}

#[tokio::test]
async fn test_messages_for_unknown_user_is_empty() {
    let app = make_app(Some("hi"), Some("hi")).await;
    let (status, body) = send(&app, "GET", "/api/messages/nobody/dnya", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "messages": [] }));
}

#[tokio::test]
async fn test_assistant_id_is_not_a_user() {
    let app = make_app(Some("hi"), Some("hi")).await;

    let (status, body) = send(&app, "POST", "/api/users", Some(json!({ "userId": "dnya" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (status, _) = send(
        &app,
        "PUT",
        "/api/users/consent",
        Some(json!({ "userId": "dnya", "hasConsented": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/generate-response",
        Some(json!({ "message": "hello", "userId": "dnya" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (_, body) = send(&app, "GET", "/api/messages/dnya/dnya", None).await;
    assert_eq!(body, json!({ "messages": [] }));
}

#[tokio::test]
async fn test_mistyped_chat_body_is_bad_request() {
    let app = make_app(Some("hi"), Some("hi")).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/generate-response",
        Some(json!({ "message": 5, "userId": "u1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (status, body) = send(
        &app,
        "PUT",
        "/api/users/consent",
        Some(json!({ "userId": "u1", "hasConsented": "yes" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_mistyped_credentials_are_bad_request() {
    let app = make_app(Some("hi"), Some("hi")).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/signup",
        Some(json!({ "email": ["a@x.com"], "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = make_app(Some("hi"), Some("hi")).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header("content-type", "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();

    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].as_str().is_some());
}
