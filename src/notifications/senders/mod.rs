use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::notifications::models::ChangeNotification;

pub mod email;
pub mod slack;

/// Single-attempt delivery; there is no automatic retry.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum SenderError {
    #[error("Failed to send notification: {0}")]
    SendFailed(String),
    #[error("Invalid configuration for sender: {0}")]
    InvalidConfiguration(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Templating error: {0}")]
    TemplatingError(String),
}

/// A trait for sending notifications to a specific channel type.
///
/// `destination` is the channel address: a recipient email address for the
/// email sender, a webhook URL for the slack sender.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(
        &self,
        destination: &str,
        notification: &ChangeNotification,
    ) -> Result<(), SenderError>;
}
