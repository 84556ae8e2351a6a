use chrono::{NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::DiffAnalyzer;
use crate::db::models::{NewCheckRecord, daily_check_quota};
use crate::db::store::{CheckStore, StoreError};
use crate::monitoring::classifier::{Importance, classify};
use crate::monitoring::differ::compare_content;
use crate::monitoring::fetcher::{FetchError, PageFetcher};
use crate::notifications::models::{ChangeNotification, NotificationPrefs};
use crate::notifications::service::ChangeNotifier;

pub const OUTCOME_CHANGED: &str = "changed";
pub const OUTCOME_UNCHANGED: &str = "unchanged";
pub const OUTCOME_ERROR: &str = "error";

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("site {0} not found")]
    SiteNotFound(Uuid),
    #[error("site {0} is not active")]
    SiteInactive(Uuid),
    #[error("profile for user {0} not found")]
    ProfileNotFound(Uuid),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Structured result of one check invocation, returned to the scheduling
/// caller. A check never fails with an exception past this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub site_id: Uuid,
    pub success: bool,
    pub has_changes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    pub rate_limited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckOutcome {
    fn completed(site_id: Uuid, has_changes: bool, importance: Option<Importance>) -> Self {
        Self {
            site_id,
            success: true,
            has_changes,
            importance,
            rate_limited: false,
            error: None,
        }
    }

    fn failure(site_id: Uuid, error: String) -> Self {
        Self {
            site_id,
            success: false,
            has_changes: false,
            importance: None,
            rate_limited: false,
            error: Some(error),
        }
    }

    /// Quota exhaustion is an expected outcome, not a failure.
    fn rate_limited(site_id: Uuid) -> Self {
        Self {
            site_id,
            success: true,
            has_changes: false,
            importance: None,
            rate_limited: true,
            error: None,
        }
    }
}

/// Runs the full check pipeline for one monitored site: fetch, diff,
/// classify, analyze, persist, notify. All collaborators are injected
/// ports, so the pipeline runs against stubs in tests.
pub struct CheckService {
    store: Arc<dyn CheckStore>,
    fetcher: Arc<dyn PageFetcher>,
    analyzer: Arc<dyn DiffAnalyzer>,
    notifier: Arc<dyn ChangeNotifier>,
    app_url: String,
}

impl CheckService {
    pub fn new(
        store: Arc<dyn CheckStore>,
        fetcher: Arc<dyn PageFetcher>,
        analyzer: Arc<dyn DiffAnalyzer>,
        notifier: Arc<dyn ChangeNotifier>,
        app_url: String,
    ) -> Self {
        Self {
            store,
            fetcher,
            analyzer,
            notifier,
            app_url,
        }
    }

    pub async fn run_check(&self, site_id: Uuid) -> CheckOutcome {
        match self.execute(site_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(%site_id, error = %e, "check failed");
                // Unknown or inactive sites never ran a check, so they get
                // no history record.
                if !matches!(
                    e,
                    CheckError::SiteNotFound(_) | CheckError::SiteInactive(_)
                ) {
                    self.record_error(site_id, &e.to_string()).await;
                }
                CheckOutcome::failure(site_id, e.to_string())
            }
        }
    }

    async fn execute(&self, site_id: Uuid) -> Result<CheckOutcome, CheckError> {
        let site = self
            .store
            .get_site(site_id)
            .await?
            .ok_or(CheckError::SiteNotFound(site_id))?;
        if !site.is_active {
            return Err(CheckError::SiteInactive(site_id));
        }

        let profile = self
            .store
            .get_profile(site.user_id)
            .await?
            .ok_or(CheckError::ProfileNotFound(site.user_id))?;

        if let Some(quota) = daily_check_quota(&profile.plan) {
            let start_of_day = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
            let used = self
                .store
                .count_checks_for_user_since(site.user_id, start_of_day)
                .await?;
            if used >= quota {
                info!(site = %site.name, plan = %profile.plan, used, quota, "daily check quota exhausted");
                return Ok(CheckOutcome::rate_limited(site_id));
            }
        }

        let page = self.fetcher.fetch(&site.url).await?;

        let baseline = self.store.get_snapshot(site_id).await?;
        let old_content = baseline.map(|s| s.content).unwrap_or_default();
        let metrics = compare_content(&old_content, &page.content);

        // The fresh content becomes the baseline for the next check.
        self.store
            .upsert_snapshot(site_id, &page.content, page.fetched_at)
            .await?;
        self.store.mark_site_checked(site_id, page.fetched_at).await?;

        if !metrics.has_changes {
            info!(site = %site.name, "no changes detected");
            self.store
                .append_check_record(&NewCheckRecord {
                    site_id,
                    checked_at: page.fetched_at,
                    outcome: OUTCOME_UNCHANGED.to_string(),
                    changes_count: 0,
                    change_percentage: 0.0,
                    importance: None,
                    summary: None,
                    intent: None,
                    suggestions: None,
                    error_message: None,
                })
                .await?;
            return Ok(CheckOutcome::completed(site_id, false, None));
        }

        let importance = classify(&metrics);
        let analysis = self
            .analyzer
            .analyze(&site.name, &metrics.added_lines, &metrics.removed_lines)
            .await;

        let notification = ChangeNotification {
            site_name: site.name.clone(),
            site_url: site.url.clone(),
            dashboard_url: format!("{}/dashboard", self.app_url.trim_end_matches('/')),
            importance,
            changes_count: metrics.changes_count,
            change_percentage: metrics.change_percentage,
            summary: analysis.summary.clone(),
            intent: analysis.intent.clone(),
            suggestions: analysis.suggestions.join("\n"),
        };
        let prefs = NotificationPrefs::from(&profile);
        let delivered = self.notifier.notify_change(&prefs, &notification).await;
        info!(
            site = %site.name,
            importance = importance.as_str(),
            email = delivered.email,
            slack = delivered.slack,
            "change detected and notifications dispatched"
        );

        self.store
            .append_check_record(&NewCheckRecord {
                site_id,
                checked_at: page.fetched_at,
                outcome: OUTCOME_CHANGED.to_string(),
                changes_count: metrics.changes_count as i32,
                change_percentage: metrics.change_percentage,
                importance: Some(importance.as_str().to_string()),
                summary: Some(analysis.summary),
                intent: Some(analysis.intent),
                suggestions: Some(serde_json::json!(analysis.suggestions)),
                error_message: None,
            })
            .await?;

        Ok(CheckOutcome::completed(site_id, true, Some(importance)))
    }

    /// Best-effort error record; a store that is already failing must not
    /// mask the original error.
    async fn record_error(&self, site_id: Uuid, message: &str) {
        let record = NewCheckRecord {
            site_id,
            checked_at: Utc::now(),
            outcome: OUTCOME_ERROR.to_string(),
            changes_count: 0,
            change_percentage: 0.0,
            importance: None,
            summary: None,
            intent: None,
            suggestions: None,
            error_message: Some(message.to_string()),
        };
        if let Err(e) = self.store.append_check_record(&record).await {
            warn!(%site_id, error = %e, "failed to write error record");
        }
    }
}
