use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

use super::service::CheckService;
use crate::db::store::CheckStore;

/// One site's aggregated result within a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub site_id: Uuid,
    pub site_name: String,
    pub success: bool,
    pub has_changes: bool,
    /// Set when the owner's daily quota skipped this check; distinguishes
    /// a skip from a genuinely unchanged page.
    pub rate_limited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub success: bool,
    pub checked_count: usize,
    pub results: Vec<BatchEntry>,
    pub timestamp: DateTime<Utc>,
}

/// Runs the check pipeline over every active site, strictly sequentially.
///
/// Sequential execution with a pacing delay is deliberate: it bounds the
/// load both on the monitored third-party sites and on the external
/// analysis API. One site's failure never aborts the run.
pub struct BatchRunner {
    store: Arc<dyn CheckStore>,
    checker: Arc<CheckService>,
    pacing: Duration,
}

impl BatchRunner {
    pub fn new(store: Arc<dyn CheckStore>, checker: Arc<CheckService>, pacing: Duration) -> Self {
        Self {
            store,
            checker,
            pacing,
        }
    }

    pub async fn run_all(&self) -> BatchReport {
        let sites = match self.store.list_active_sites().await {
            Ok(sites) => sites,
            Err(e) => {
                error!(error = %e, "failed to list active sites for batch run");
                return BatchReport {
                    success: false,
                    checked_count: 0,
                    results: Vec::new(),
                    timestamp: Utc::now(),
                };
            }
        };

        info!(count = sites.len(), "starting batch check run");

        let mut results = Vec::with_capacity(sites.len());
        for (i, site) in sites.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.pacing).await;
            }
            let outcome = self.checker.run_check(site.id).await;
            info!(
                site = %site.name,
                success = outcome.success,
                has_changes = outcome.has_changes,
                rate_limited = outcome.rate_limited,
                "site checked"
            );
            results.push(BatchEntry {
                site_id: site.id,
                site_name: site.name.clone(),
                success: outcome.success,
                has_changes: outcome.has_changes,
                rate_limited: outcome.rate_limited,
                error: outcome.error,
            });
        }

        BatchReport {
            success: true,
            checked_count: results.len(),
            results,
            timestamp: Utc::now(),
        }
    }
}
