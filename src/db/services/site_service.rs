use chrono::{DateTime, Utc};
use sqlx::{PgPool, Result};
use uuid::Uuid;

use crate::db::models::{ActiveSite, MonitoredSite};

// --- Monitored site service functions ---

/// Registers a new site for monitoring. Plan limits are enforced by the caller.
pub async fn create_site(
    pool: &PgPool,
    user_id: Uuid,
    url: &str,
    name: &str,
) -> Result<MonitoredSite> {
    let now = Utc::now();
    sqlx::query_as::<_, MonitoredSite>(
        r#"
        INSERT INTO monitored_sites (id, user_id, url, name, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, TRUE, $5, $5)
        RETURNING id, user_id, url, name, is_active, last_checked_at, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(url)
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Retrieves a site by its ID.
pub async fn get_site_by_id(pool: &PgPool, site_id: Uuid) -> Result<Option<MonitoredSite>> {
    sqlx::query_as::<_, MonitoredSite>(
        "SELECT id, user_id, url, name, is_active, last_checked_at, created_at, updated_at
         FROM monitored_sites WHERE id = $1",
    )
    .bind(site_id)
    .fetch_optional(pool)
    .await
}

/// Retrieves all of a user's sites, newest first.
pub async fn list_sites_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<MonitoredSite>> {
    sqlx::query_as::<_, MonitoredSite>(
        "SELECT id, user_id, url, name, is_active, last_checked_at, created_at, updated_at
         FROM monitored_sites WHERE user_id = $1
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Counts the sites a user has registered, for plan limit enforcement.
pub async fn count_sites_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM monitored_sites WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Partially updates a site's editable fields. Absent fields keep their value.
pub async fn update_site(
    pool: &PgPool,
    site_id: Uuid,
    url: Option<String>,
    name: Option<String>,
    is_active: Option<bool>,
) -> Result<Option<MonitoredSite>> {
    sqlx::query_as::<_, MonitoredSite>(
        r#"
        UPDATE monitored_sites
        SET url = COALESCE($1, url),
            name = COALESCE($2, name),
            is_active = COALESCE($3, is_active),
            updated_at = $4
        WHERE id = $5
        RETURNING id, user_id, url, name, is_active, last_checked_at, created_at, updated_at
        "#,
    )
    .bind(url)
    .bind(name)
    .bind(is_active)
    .bind(Utc::now())
    .bind(site_id)
    .fetch_optional(pool)
    .await
}

/// Deletes a site. Its snapshot and check history cascade with it.
pub async fn delete_site(pool: &PgPool, site_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM monitored_sites WHERE id = $1")
        .bind(site_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Stamps a site as checked.
pub async fn mark_site_checked(pool: &PgPool, site_id: Uuid, at: DateTime<Utc>) -> Result<()> {
    sqlx::query("UPDATE monitored_sites SET last_checked_at = $1, updated_at = $1 WHERE id = $2")
        .bind(at)
        .bind(site_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Retrieves all active sites joined with their owner's notification
/// preferences, for the batch runner.
pub async fn list_active_sites_with_prefs(pool: &PgPool) -> Result<Vec<ActiveSite>> {
    sqlx::query_as::<_, ActiveSite>(
        r#"
        SELECT s.id, s.url, s.name, s.user_id,
               p.email, p.notification_email, p.notification_slack, p.slack_webhook_url
        FROM monitored_sites s
        JOIN profiles p ON p.user_id = s.user_id
        WHERE s.is_active = TRUE
        ORDER BY s.created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await
}
