use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::models::site_limit;
use crate::db::services::{history_service, profile_service, site_service};
use crate::web::AppState;
use crate::web::error::AppError;
use crate::web::models::{
    CheckRecordResponse, CreateSiteRequest, ListSitesQuery, SiteResponse, UpdateSiteRequest,
};

const HISTORY_LIMIT: i64 = 20;

fn validate_url(url: &str) -> Result<(), AppError> {
    reqwest::Url::parse(url)
        .map_err(|_| AppError::InvalidInput("A valid URL is required".to_string()))?;
    Ok(())
}

/// Lists a user's sites, newest first.
pub async fn list_sites_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSitesQuery>,
) -> Result<Json<Vec<SiteResponse>>, AppError> {
    let sites = site_service::list_sites_for_user(&state.db_pool, query.user_id).await?;
    Ok(Json(sites.into_iter().map(Into::into).collect()))
}

/// Registers a new site for monitoring, enforcing the owner's plan limit.
pub async fn create_site_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateSiteRequest>,
) -> Result<(StatusCode, Json<SiteResponse>), AppError> {
    if payload.url.is_empty() || payload.name.is_empty() {
        return Err(AppError::InvalidInput(
            "URL and site name are required".to_string(),
        ));
    }
    validate_url(&payload.url)?;

    let profile = profile_service::get_profile(&state.db_pool, payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let limit = site_limit(&profile.plan);
    let existing = site_service::count_sites_for_user(&state.db_pool, payload.user_id).await?;
    if existing >= limit {
        return Err(AppError::Forbidden(format!(
            "The {} plan allows at most {} monitored sites",
            profile.plan, limit
        )));
    }

    let site =
        site_service::create_site(&state.db_pool, payload.user_id, &payload.url, &payload.name)
            .await?;
    Ok((StatusCode::CREATED, Json(site.into())))
}

/// Partially updates a site's URL, name or active flag.
pub async fn update_site_handler(
    State(state): State<Arc<AppState>>,
    Path(site_id): Path<Uuid>,
    Json(payload): Json<UpdateSiteRequest>,
) -> Result<Json<SiteResponse>, AppError> {
    if let Some(url) = payload.url.as_deref() {
        validate_url(url)?;
    }

    let updated = site_service::update_site(
        &state.db_pool,
        site_id,
        payload.url,
        payload.name,
        payload.is_active,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Site not found".to_string()))?;

    Ok(Json(updated.into()))
}

pub async fn delete_site_handler(
    State(state): State<Arc<AppState>>,
    Path(site_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = site_service::delete_site(&state.db_pool, site_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Site not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Returns the site's most recent check records, newest first.
pub async fn site_changes_handler(
    State(state): State<Arc<AppState>>,
    Path(site_id): Path<Uuid>,
) -> Result<Json<Vec<CheckRecordResponse>>, AppError> {
    site_service::get_site_by_id(&state.db_pool, site_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Site not found".to_string()))?;

    let records =
        history_service::recent_checks_for_site(&state.db_pool, site_id, HISTORY_LIMIT).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}
