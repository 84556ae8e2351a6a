use serde::{Deserialize, Serialize};

use crate::db::models::Profile;
use crate::monitoring::classifier::Importance;

/// Everything a channel needs to render a change notification.
#[derive(Debug, Clone)]
pub struct ChangeNotification {
    pub site_name: String,
    /// The monitored page itself, linked from the "view site" button.
    pub site_url: String,
    /// Deep link into the dashboard, linked from the email body.
    pub dashboard_url: String,
    pub importance: Importance,
    pub changes_count: usize,
    pub change_percentage: f64,
    pub summary: String,
    pub intent: String,
    /// Suggested actions, one per line.
    pub suggestions: String,
}

/// Per-channel success flags for one dispatch attempt. Returned to the
/// caller for logging, not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOutcome {
    pub email: bool,
    pub slack: bool,
}

/// Which channels a subscriber wants, and where.
#[derive(Debug, Clone)]
pub struct NotificationPrefs {
    pub email_enabled: bool,
    pub email: String,
    pub slack_enabled: bool,
    pub slack_webhook_url: Option<String>,
}

impl From<&Profile> for NotificationPrefs {
    fn from(profile: &Profile) -> Self {
        Self {
            email_enabled: profile.notification_email,
            email: profile.email.clone(),
            slack_enabled: profile.notification_slack,
            slack_webhook_url: profile.slack_webhook_url.clone(),
        }
    }
}
