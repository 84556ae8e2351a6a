use async_trait::async_trait;
use tracing::{info, warn};

use super::models::{ChangeNotification, NotificationOutcome, NotificationPrefs};
use super::senders::{NotificationSender, email::EmailSender, slack::SlackSender};

/// Notification port consumed by the check orchestrator.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    /// Dispatches through every channel the subscriber enabled. Channel
    /// failures are logged and reported as false flags, never returned as
    /// errors.
    async fn notify_change(
        &self,
        prefs: &NotificationPrefs,
        notification: &ChangeNotification,
    ) -> NotificationOutcome;
}

pub struct NotificationService {
    /// Absent when no email provider key is configured.
    email: Option<EmailSender>,
    slack: SlackSender,
}

impl NotificationService {
    pub fn new(email: Option<EmailSender>) -> Self {
        Self {
            email,
            slack: SlackSender::new(),
        }
    }
}

#[async_trait]
impl ChangeNotifier for NotificationService {
    async fn notify_change(
        &self,
        prefs: &NotificationPrefs,
        notification: &ChangeNotification,
    ) -> NotificationOutcome {
        let mut outcome = NotificationOutcome::default();

        if prefs.email_enabled {
            match &self.email {
                Some(sender) => match sender.send(&prefs.email, notification).await {
                    Ok(()) => {
                        outcome.email = true;
                        info!(site = %notification.site_name, to = %prefs.email, "email notification sent");
                    }
                    Err(e) => {
                        warn!(site = %notification.site_name, error = %e, "email notification failed");
                    }
                },
                None => {
                    warn!(
                        site = %notification.site_name,
                        "email channel enabled but no email provider is configured"
                    );
                }
            }
        }

        if prefs.slack_enabled {
            // The slack channel also needs a configured webhook URL.
            if let Some(url) = prefs.slack_webhook_url.as_deref().filter(|u| !u.is_empty()) {
                match self.slack.send(url, notification).await {
                    Ok(()) => {
                        outcome.slack = true;
                        info!(site = %notification.site_name, "slack notification sent");
                    }
                    Err(e) => {
                        warn!(site = %notification.site_name, error = %e, "slack notification failed");
                    }
                }
            }
        }

        outcome
    }
}
