use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tera::{Context, Tera};

use super::{NotificationSender, SEND_TIMEOUT, SenderError};
use crate::notifications::models::ChangeNotification;

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

/// Fixed HTML template for the change alert email, rendered with Tera.
const EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <style>
      body { font-family: sans-serif; line-height: 1.6; color: #333; }
      .container { max-width: 600px; margin: 0 auto; padding: 20px; }
      .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; border-radius: 8px 8px 0 0; }
      .content { background: #f9fafb; padding: 30px; border: 1px solid #e5e7eb; border-top: none; }
      .label { font-weight: bold; color: #6b7280; margin-top: 20px; margin-bottom: 8px; }
      .value { background: white; padding: 15px; border-radius: 6px; border: 1px solid #e5e7eb; white-space: pre-wrap; }
      .footer { text-align: center; margin-top: 30px; color: #9ca3af; font-size: 14px; }
      .button { display: inline-block; background: #667eea; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; margin-top: 20px; }
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <h1 style="margin: 0;">{{ emoji }} Changes detected on {{ site_name }}</h1>
      </div>
      <div class="content">
        <div class="label">Importance</div>
        <div class="value">{{ importance | upper }}</div>

        <div class="label">Scale</div>
        <div class="value">{{ changes_count }} changed lines ({{ change_percentage }}% of the page)</div>

        <div class="label">What changed</div>
        <div class="value">{{ summary }}</div>

        <div class="label">Likely intent</div>
        <div class="value">{{ intent }}</div>

        <div class="label">Suggested actions</div>
        <div class="value">{{ suggestions }}</div>

        <a href="{{ dashboard_url }}" class="button">Open the dashboard</a>
      </div>
      <div class="footer">
        <p>SiteWatch - competitor site monitoring</p>
      </div>
    </div>
  </body>
</html>"#;

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: String,
    html: String,
}

/// A sender delivering change alerts through a Resend-style email API.
pub struct EmailSender {
    client: Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl EmailSender {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            from,
        }
    }

    /// Points the sender at a different API host. Used by tests.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn render_html(notification: &ChangeNotification) -> Result<String, SenderError> {
        let mut context = Context::new();
        context.insert("emoji", notification.importance.emoji());
        context.insert("site_name", &notification.site_name);
        context.insert("importance", notification.importance.as_str());
        context.insert("changes_count", &notification.changes_count);
        context.insert("change_percentage", &notification.change_percentage);
        context.insert("summary", &notification.summary);
        context.insert("intent", &notification.intent);
        context.insert("suggestions", &notification.suggestions);
        context.insert("dashboard_url", &notification.dashboard_url);

        Tera::one_off(EMAIL_TEMPLATE, &context, true)
            .map_err(|e| SenderError::TemplatingError(e.to_string()))
    }

    pub fn subject(notification: &ChangeNotification) -> String {
        format!(
            "[SiteWatch] Changes detected on {}",
            notification.site_name
        )
    }
}

#[async_trait]
impl NotificationSender for EmailSender {
    async fn send(
        &self,
        destination: &str,
        notification: &ChangeNotification,
    ) -> Result<(), SenderError> {
        let payload = SendEmailRequest {
            from: &self.from,
            to: vec![destination],
            subject: Self::subject(notification),
            html: Self::render_html(notification)?,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
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
                "Email API returned non-success status: {status}. Body: {error_body}"
            )));
        }

        Ok(())
    }
}
