use chrono::{DateTime, Utc};
use sqlx::{PgPool, Result};
use uuid::Uuid;

use crate::db::models::{CheckRecord, NewCheckRecord};

/// Appends one check history record. Records are never updated afterwards.
pub async fn append_check_record(pool: &PgPool, record: &NewCheckRecord) -> Result<CheckRecord> {
    sqlx::query_as::<_, CheckRecord>(
        r#"
        INSERT INTO site_check_history
            (id, site_id, checked_at, outcome, changes_count, change_percentage,
             importance, summary, intent, suggestions, error_message)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, site_id, checked_at, outcome, changes_count, change_percentage,
                  importance, summary, intent, suggestions, error_message
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(record.site_id)
    .bind(record.checked_at)
    .bind(&record.outcome)
    .bind(record.changes_count)
    .bind(record.change_percentage)
    .bind(&record.importance)
    .bind(&record.summary)
    .bind(&record.intent)
    .bind(&record.suggestions)
    .bind(&record.error_message)
    .fetch_one(pool)
    .await
}

/// Retrieves the most recent check records for a site, newest first.
pub async fn recent_checks_for_site(
    pool: &PgPool,
    site_id: Uuid,
    limit: i64,
) -> Result<Vec<CheckRecord>> {
    sqlx::query_as::<_, CheckRecord>(
        r#"
        SELECT id, site_id, checked_at, outcome, changes_count, change_percentage,
               importance, summary, intent, suggestions, error_message
        FROM site_check_history
        WHERE site_id = $1
        ORDER BY checked_at DESC
        LIMIT $2
        "#,
    )
    .bind(site_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Counts checks executed for any of a user's sites since the given instant.
/// Used for daily quota enforcement.
pub async fn count_checks_for_user_since(
    pool: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM site_check_history h
        JOIN monitored_sites s ON s.id = h.site_id
        WHERE s.user_id = $1 AND h.checked_at >= $2
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_one(pool)
    .await
}
