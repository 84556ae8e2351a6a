use chrono::{DateTime, Utc};
use sqlx::{PgPool, Result};
use uuid::Uuid;

use crate::db::models::SiteSnapshot;

/// Retrieves the comparison baseline for a site, if one exists yet.
pub async fn get_snapshot(pool: &PgPool, site_id: Uuid) -> Result<Option<SiteSnapshot>> {
    sqlx::query_as::<_, SiteSnapshot>(
        "SELECT site_id, content, fetched_at FROM site_snapshots WHERE site_id = $1",
    )
    .bind(site_id)
    .fetch_optional(pool)
    .await
}

/// Replaces the site's snapshot wholesale with freshly fetched content.
pub async fn upsert_snapshot(
    pool: &PgPool,
    site_id: Uuid,
    content: &str,
    fetched_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO site_snapshots (site_id, content, fetched_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (site_id) DO UPDATE SET content = $2, fetched_at = $3
        "#,
    )
    .bind(site_id)
    .bind(content)
    .bind(fetched_at)
    .execute(pool)
    .await?;
    Ok(())
}
