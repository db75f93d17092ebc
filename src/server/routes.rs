//! Request handlers.

use crate::domain::model::InterpretationStatus;
use crate::server::error::ApiError;
use crate::server::types::{
    DrawQuery, DrawResponse, HealthResponse, InterpretationResponse, InterpretationStatusResponse,
};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "tarot-reader",
    })
}

/// GET /cards - draw three cards, interpretation follows in the background.
pub async fn draw_cards(
    State(state): State<AppState>,
    Query(query): Query<DrawQuery>,
) -> Result<Json<DrawResponse>, ApiError> {
    let pending = state
        .orchestrator
        .begin_draw(&query.userstory, &query.name)
        .await?;

    let response = DrawResponse::from(&pending.draw);

    // Detached: the task writes its outcome into the store and is never joined.
    drop(pending.job.spawn());

    Ok(Json(response))
}

/// GET /cards/interpret/:uuid
pub async fn get_interpretation(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<InterpretationResponse>, ApiError> {
    let interpretation = Uuid::parse_str(&uuid)
        .ok()
        .and_then(|id| state.orchestrator.fetch_interpretation(&id));

    match interpretation {
        Some(interpretation) => Ok(Json(InterpretationResponse { interpretation })),
        None => {
            tracing::debug!(request_id = %uuid, "Interpretation not available");
            Err(ApiError::InterpretationNotFound)
        }
    }
}

/// GET /cards/interpret/:uuid/status
pub async fn get_interpretation_status(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Json<InterpretationStatusResponse> {
    let (status, updated_at, reason) = match Uuid::parse_str(&uuid) {
        Ok(id) => (
            state.orchestrator.interpretation_status(&id),
            state.orchestrator.store().updated_at(&id),
            state.orchestrator.failure_reason(&id),
        ),
        Err(_) => (InterpretationStatus::Unknown, None, None),
    };

    Json(InterpretationStatusResponse {
        request_id: uuid,
        status,
        updated_at,
        reason,
    })
}
