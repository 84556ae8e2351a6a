use chrono::Utc;
use sqlx::{PgPool, Result};
use uuid::Uuid;

use crate::db::models::Profile;

/// Retrieves a subscriber's plan and notification preferences.
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>> {
    sqlx::query_as::<_, Profile>(
        "SELECT user_id, email, plan, notification_email, notification_slack, slack_webhook_url
         FROM profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Partially updates a subscriber's notification preferences. Absent fields
/// keep their value; an empty webhook URL clears the stored one.
pub async fn update_notification_prefs(
    pool: &PgPool,
    user_id: Uuid,
    notification_email: Option<bool>,
    notification_slack: Option<bool>,
    slack_webhook_url: Option<String>,
) -> Result<Option<Profile>> {
    sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET notification_email = COALESCE($1, notification_email),
            notification_slack = COALESCE($2, notification_slack),
            slack_webhook_url = CASE
                WHEN $3::TEXT IS NULL THEN slack_webhook_url
                WHEN $3 = '' THEN NULL
                ELSE $3
            END,
            updated_at = $4
        WHERE user_id = $5
        RETURNING user_id, email, plan, notification_email, notification_slack, slack_webhook_url
        "#,
    )
    .bind(notification_email)
    .bind(notification_slack)
    .bind(slack_webhook_url)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
