//! Control-plane REST API for creating, inspecting, and deleting scouts.

mod engine_client;
mod rest;

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};

use ai_client::Claude;
use terascout_common::Config;
use terascout_store::ScoutStore;

pub use engine_client::{EngineClient, EngineClientError};

/// Shared state for every control-plane handler. Grounded on
/// `rootsignal-api::AppState`: the store handle, process config, the
/// long-lived Claude client used for source discovery, and a handle to
/// spawn/cancel engine workflow invocations.
pub struct AppState {
    pub store: ScoutStore,
    pub config: Config,
    pub claude: Claude,
    pub engine: EngineClient,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/scouts", post(rest::create_scout))
        .route("/api/scouts/{id}", get(rest::get_scout))
        .route("/api/scouts/{id}", delete(rest::delete_scout))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
