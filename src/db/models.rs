use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A competitor page registered for monitoring.
/// Corresponds to the `monitored_sites` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonitoredSite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub url: String,
    pub name: String,
    pub is_active: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The most recently fetched content for a site. Exactly one row per site;
/// overwritten on every check, never versioned.
/// Corresponds to the `site_snapshots` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteSnapshot {
    pub site_id: Uuid,
    pub content: String,
    pub fetched_at: DateTime<Utc>,
}

/// Subscriber profile with plan and notification preferences.
/// Corresponds to the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub email: String,
    pub plan: String, // "free", "pro" or "business"
    pub notification_email: bool,
    pub notification_slack: bool,
    pub slack_webhook_url: Option<String>,
}

/// Append-only log entry for one check execution.
/// Corresponds to the `site_check_history` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CheckRecord {
    pub id: Uuid,
    pub site_id: Uuid,
    pub checked_at: DateTime<Utc>,
    pub outcome: String, // "changed", "unchanged" or "error"
    pub changes_count: i32,
    pub change_percentage: f64,
    pub importance: Option<String>,
    pub summary: Option<String>,
    pub intent: Option<String>,
    pub suggestions: Option<serde_json::Value>,
    pub error_message: Option<String>,
}

/// Insert payload for `site_check_history`. Records are never mutated
/// after creation.
#[derive(Debug, Clone)]
pub struct NewCheckRecord {
    pub site_id: Uuid,
    pub checked_at: DateTime<Utc>,
    pub outcome: String,
    pub changes_count: i32,
    pub change_percentage: f64,
    pub importance: Option<String>,
    pub summary: Option<String>,
    pub intent: Option<String>,
    pub suggestions: Option<serde_json::Value>,
    pub error_message: Option<String>,
}

/// Join row produced by the batch query: an active site together with its
/// owner's notification preferences.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActiveSite {
    pub id: Uuid,
    pub url: String,
    pub name: String,
    pub user_id: Uuid,
    pub email: String,
    pub notification_email: bool,
    pub notification_slack: bool,
    pub slack_webhook_url: Option<String>,
}

/// Maximum number of monitored sites per plan.
pub fn site_limit(plan: &str) -> i64 {
    match plan {
        "business" => 20,
        "pro" => 5,
        _ => 1,
    }
}

/// Daily check quota per plan. `None` means unlimited.
pub fn daily_check_quota(plan: &str) -> Option<i64> {
    match plan {
        "business" => None,
        "pro" => Some(10),
        _ => Some(3),
    }
}
