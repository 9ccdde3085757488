//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/`.
//! Middleware: CORS, tracing.
//!
//! The built chat client is served from `web_dir` (config or `DNYA_WEB_DIR`,
//! default `web/dist`). API routes take priority; unknown paths fall
//! through to the client's `index.html`. If the directory does not exist,
//! only the API is served.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

const DEFAULT_WEB_DIR: &str = "web/dist";

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let web_dir = state
        .config
        .server
        .web_dir
        .clone()
        .unwrap_or_else(|| DEFAULT_WEB_DIR.to_string());

    let api_routes = Router::new()
        // Accounts
        .route("/signup", post(handlers::account::signup))
        .route("/login", post(handlers::account::login))
        .route("/me", get(handlers::account::me))
        // Chat profiles
        .route("/users", post(handlers::profile::get_or_create_user))
        .route("/users/consent", put(handlers::profile::update_consent))
        // Conversation
        .route(
            "/messages/{user_id}/dnya",
            get(handlers::chat::get_messages),
        )
        .route(
            "/generate-response",
            post(handlers::chat::generate_response),
        );

    let mut router = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if std::path::Path::new(&web_dir).exists() {
        let index_path = format!("{web_dir}/index.html");
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir, "chat client static file serving enabled");
    }

    router
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
