use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("sitewatch/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned non-success status: {status}")]
    Status { url: String, status: StatusCode },
}

/// Raw page content together with the instant it was retrieved.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub content: String,
    pub fetched_at: DateTime<Utc>,
}

/// Retrieval port for monitored pages. This is a plain content fetch; pages
/// are not rendered or executed.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let content = response.text().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedPage {
            content,
            fetched_at: Utc::now(),
        })
    }
}
