// Web server: the HTTP gateway the browser extension calls.
//
// POST /rewrite takes `{ "text": ... }` and returns `{ "rewrite", "is_safe" }`.
// CORS is wide open because requests come from content scripts on arbitrary
// origins. No auth, no rate limiting.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::pipeline::ModerationPipeline;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ModerationPipeline>,
}

impl AppState {
    pub fn new(pipeline: ModerationPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Start the Axum web server and block until it exits.
///
/// The pipeline must be fully constructed before this is called, so a
/// missing model or credential fails before the listener binds.
pub async fn run_server(pipeline: ModerationPipeline, port: u16, bind: &str) -> Result<()> {
    let app = build_router(AppState::new(pipeline));

    let addr = format!("{bind}:{port}");
    info!("respectrewrite gateway listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/rewrite", post(handlers::rewrite::rewrite))
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
