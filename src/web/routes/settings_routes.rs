use axum::{Json, extract::State};
use std::sync::Arc;

use crate::db::services::profile_service;
use crate::web::AppState;
use crate::web::error::AppError;
use crate::web::models::{ProfileResponse, UpdateSettingsRequest};

/// Updates the subscriber's notification preferences: channel toggles and
/// the Slack webhook URL the notifier dispatches to.
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    if let Some(url) = payload.slack_webhook_url.as_deref() {
        // empty clears the stored URL, anything else must parse
        if !url.is_empty() && reqwest::Url::parse(url).is_err() {
            return Err(AppError::InvalidInput(
                "A valid Slack webhook URL is required".to_string(),
            ));
        }
    }

    let updated = profile_service::update_notification_prefs(
        &state.db_pool,
        payload.user_id,
        payload.notification_email,
        payload.notification_slack,
        payload.slack_webhook_url,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(updated.into()))
}
