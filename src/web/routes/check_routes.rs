use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::checker::{BatchReport, CheckOutcome};
use crate::web::AppState;
use crate::web::error::AppError;

/// Runs the check pipeline for one site right now. The outcome is always a
/// structured result; per-site failures are reported inside it, not as an
/// HTTP error.
pub async fn check_site_handler(
    State(state): State<Arc<AppState>>,
    Path(site_id): Path<Uuid>,
) -> Json<CheckOutcome> {
    Json(state.checker.run_check(site_id).await)
}

/// Batch entry point for the external scheduler. `GET` is an alias for
/// manual runs.
pub async fn daily_check_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BatchReport>, AppError> {
    if let Some(secret) = &state.cron_secret {
        let expected = format!("Bearer {secret}");
        let authorized = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| v == expected)
            .unwrap_or(false);
        if !authorized {
            return Err(AppError::Unauthorized("Unauthorized".to_string()));
        }
    }

    Ok(Json(state.batch.run_all().await))
}
