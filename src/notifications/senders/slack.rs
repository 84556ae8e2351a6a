use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::{NotificationSender, SEND_TIMEOUT, SenderError};
use crate::notifications::models::ChangeNotification;

/// A sender posting block-kit messages to a subscriber-supplied Slack
/// incoming-webhook URL.
pub struct SlackSender {
    client: Client,
}

impl Default for SlackSender {
    fn default() -> Self {
        Self::new()
    }
}

impl SlackSender {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn build_payload(notification: &ChangeNotification) -> Value {
        json!({
            "blocks": [
                {
                    "type": "header",
                    "text": {
                        "type": "plain_text",
                        "text": format!(
                            "{} Changes detected on a competitor site",
                            notification.importance.emoji()
                        ),
                        "emoji": true,
                    },
                },
                {
                    "type": "section",
                    "fields": [
                        {
                            "type": "mrkdwn",
                            "text": format!("*Site:*\n{}", notification.site_name),
                        },
                        {
                            "type": "mrkdwn",
                            "text": format!(
                                "*Importance:*\n{}",
                                notification.importance.as_str().to_uppercase()
                            ),
                        },
                    ],
                },
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": format!("*What changed:*\n{}", notification.summary),
                    },
                },
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": format!("*Likely intent:*\n{}", notification.intent),
                    },
                },
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": format!("*Suggested actions:*\n{}", notification.suggestions),
                    },
                },
                {
                    "type": "actions",
                    "elements": [
                        {
                            "type": "button",
                            "text": {
                                "type": "plain_text",
                                "text": "View the site",
                                "emoji": true,
                            },
                            "url": notification.site_url,
                            "style": "primary",
                        },
                    ],
                },
            ],
        })
    }
}

#[async_trait]
impl NotificationSender for SlackSender {
    async fn send(
        &self,
        destination: &str,
        notification: &ChangeNotification,
    ) -> Result<(), SenderError> {
        if destination.is_empty() {
            return Err(SenderError::InvalidConfiguration(
                "Slack webhook URL is empty.".to_string(),
            ));
        }

        let payload = Self::build_payload(notification);
        let response = self
            .client
            .post(destination)
            .timeout(SEND_TIMEOUT)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(SenderError::SendFailed(format!(
                "Slack webhook returned non-success status: {status}. Body: {error_body}"
            )));
        }

        Ok(())
    }
}
