//! HTTP surface of the service.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /cards?userstory=..&name=..` - Draw three cards
//! - `GET /cards/interpret/:uuid` - Fetch a finished interpretation
//! - `GET /cards/interpret/:uuid/status` - Pending/ready/failed/unknown

pub mod error;
pub mod routes;
pub mod types;

use crate::core::DrawOrchestrator;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<DrawOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: Arc<DrawOrchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// Added to the outbound timeout for the router's own deadline. Outbound
/// timeouts must reach the handler as `ApiError` before the layer fires.
pub const ROUTER_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// `outbound_timeout` is the budget of the shared HTTP client; the router
/// allows that plus [`ROUTER_TIMEOUT_MARGIN`].
pub fn router(state: AppState, outbound_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/cards", get(routes::draw_cards))
        .route("/cards/interpret/:uuid", get(routes::get_interpretation))
        .route(
            "/cards/interpret/:uuid/status",
            get(routes::get_interpretation_status),
        )
        .layer(TimeoutLayer::new(outbound_timeout + ROUTER_TIMEOUT_MARGIN))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
