use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{CheckRecord, MonitoredSite, Profile};

/// API request body for registering a site.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSiteRequest {
    pub user_id: Uuid,
    pub url: String,
    pub name: String,
}

/// API request body for partially updating a site.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSiteRequest {
    pub url: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing a user's sites.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSitesQuery {
    pub user_id: Uuid,
}

/// API request body for updating notification preferences. Absent fields
/// keep their current value; an empty `slackWebhookUrl` clears it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub user_id: Uuid,
    pub notification_email: Option<bool>,
    pub notification_slack: Option<bool>,
    pub slack_webhook_url: Option<String>,
}

/// API response for a subscriber profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub email: String,
    pub plan: String,
    pub notification_email: bool,
    pub notification_slack: bool,
    pub slack_webhook_url: Option<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id,
            email: profile.email,
            plan: profile.plan,
            notification_email: profile.notification_email,
            notification_slack: profile.notification_slack,
            slack_webhook_url: profile.slack_webhook_url,
        }
    }
}

/// API response for a monitored site.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub url: String,
    pub name: String,
    pub is_active: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MonitoredSite> for SiteResponse {
    fn from(site: MonitoredSite) -> Self {
        Self {
            id: site.id,
            user_id: site.user_id,
            url: site.url,
            name: site.name,
            is_active: site.is_active,
            last_checked_at: site.last_checked_at,
            created_at: site.created_at,
            updated_at: site.updated_at,
        }
    }
}

/// API response for one check history entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecordResponse {
    pub id: Uuid,
    pub site_id: Uuid,
    pub checked_at: DateTime<Utc>,
    pub outcome: String,
    pub changes_count: i32,
    pub change_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<CheckRecord> for CheckRecordResponse {
    fn from(record: CheckRecord) -> Self {
        Self {
            id: record.id,
            site_id: record.site_id,
            checked_at: record.checked_at,
            outcome: record.outcome,
            changes_count: record.changes_count,
            change_percentage: record.change_percentage,
            importance: record.importance,
            summary: record.summary,
            intent: record.intent,
            suggestions: record.suggestions,
            error_message: record.error_message,
        }
    }
}
