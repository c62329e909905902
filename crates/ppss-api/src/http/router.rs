//! Axum router configuration with middleware.
//!
//! API routes live under `/api`. `/` and `/health` sit at the root.
//! Middleware: permissive CORS and request tracing.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/login", post(handlers::login::login))
        // Global conversation
        .route("/chat", post(handlers::chat::post_chat))
        .route("/chat/{session_id}", get(handlers::chat::get_conversation))
        // Stage conversations and summaries
        .route(
            "/stage/{stage}/chat",
            get(handlers::stage::get_stage_chat).post(handlers::stage::post_stage_chat),
        )
        .route(
            "/stage/{stage}/summary",
            get(handlers::stage::get_stage_summary).post(handlers::stage::post_stage_summary),
        )
        // Data analysis
        .route("/analysis/query", post(handlers::analysis::post_query))
        .route("/analysis/queries", get(handlers::analysis::list_queries))
        // Design generation
        .route("/design/images", post(handlers::design::post_images));

    Router::new()
        .nest("/api", api_routes)
        .route("/", get(root))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /
async fn root() -> axum::Json<Value> {
    axum::Json(json!({ "status": "PPSS personalized agent API is running" }))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> axum::Json<Value> {
    axum::Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "gateway": state.gateway.name(),
    }))
}
