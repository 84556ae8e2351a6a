#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

use sitewatch::analysis::{AiAnalysis, DiffAnalyzer};
use sitewatch::db::models::{ActiveSite, MonitoredSite, NewCheckRecord, Profile, SiteSnapshot};
use sitewatch::db::store::{CheckStore, StoreError};
use sitewatch::monitoring::fetcher::{FetchError, FetchedPage, PageFetcher};
use sitewatch::notifications::models::{
    ChangeNotification, NotificationOutcome, NotificationPrefs,
};
use sitewatch::notifications::service::ChangeNotifier;

/// In-memory stand-in for the Postgres store.
#[derive(Default)]
pub struct MemoryStore {
    pub sites: Mutex<HashMap<Uuid, MonitoredSite>>,
    pub profiles: Mutex<HashMap<Uuid, Profile>>,
    pub snapshots: Mutex<HashMap<Uuid, SiteSnapshot>>,
    pub records: Mutex<Vec<NewCheckRecord>>,
    pub fail_snapshot_writes: AtomicBool,
}

impl MemoryStore {
    pub fn insert_site(&self, site: MonitoredSite) {
        self.sites.lock().unwrap().insert(site.id, site);
    }

    pub fn insert_profile(&self, profile: Profile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile);
    }

    pub fn insert_snapshot(&self, site_id: Uuid, content: &str) {
        self.snapshots.lock().unwrap().insert(
            site_id,
            SiteSnapshot {
                site_id,
                content: content.to_string(),
                fetched_at: Utc::now(),
            },
        );
    }

    pub fn recorded_outcomes(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.outcome.clone())
            .collect()
    }
}

#[async_trait]
impl CheckStore for MemoryStore {
    async fn get_site(&self, site_id: Uuid) -> Result<Option<MonitoredSite>, StoreError> {
        Ok(self.sites.lock().unwrap().get(&site_id).cloned())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn get_snapshot(&self, site_id: Uuid) -> Result<Option<SiteSnapshot>, StoreError> {
        Ok(self.snapshots.lock().unwrap().get(&site_id).cloned())
    }

    async fn upsert_snapshot(
        &self,
        site_id: Uuid,
        content: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if self.fail_snapshot_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Other("snapshot write failed".to_string()));
        }
        self.snapshots.lock().unwrap().insert(
            site_id,
            SiteSnapshot {
                site_id,
                content: content.to_string(),
                fetched_at,
            },
        );
        Ok(())
    }

    async fn mark_site_checked(&self, site_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(site) = self.sites.lock().unwrap().get_mut(&site_id) {
            site.last_checked_at = Some(at);
        }
        Ok(())
    }

    async fn append_check_record(&self, record: &NewCheckRecord) -> Result<(), StoreError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn count_checks_for_user_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let sites = self.sites.lock().unwrap();
        let count = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.checked_at >= since
                    && sites
                        .get(&r.site_id)
                        .is_some_and(|s| s.user_id == user_id)
            })
            .count();
        Ok(count as i64)
    }

    async fn list_active_sites(&self) -> Result<Vec<ActiveSite>, StoreError> {
        let profiles = self.profiles.lock().unwrap();
        let mut sites: Vec<_> = self
            .sites
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        sites.sort_by_key(|s| s.created_at);
        Ok(sites
            .into_iter()
            .filter_map(|s| {
                profiles.get(&s.user_id).map(|p| ActiveSite {
                    id: s.id,
                    url: s.url.clone(),
                    name: s.name.clone(),
                    user_id: s.user_id,
                    email: p.email.clone(),
                    notification_email: p.notification_email,
                    notification_slack: p.notification_slack,
                    slack_webhook_url: p.slack_webhook_url.clone(),
                })
            })
            .collect())
    }
}

/// Fetcher stub serving canned content per URL; unknown URLs fail.
#[derive(Default)]
pub struct StubFetcher {
    pub pages: Mutex<HashMap<String, String>>,
    pub calls: AtomicUsize,
}

impl StubFetcher {
    pub fn serve(&self, url: &str, content: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), content.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.lock().unwrap().get(url) {
            Some(content) => Ok(FetchedPage {
                content: content.clone(),
                fetched_at: Utc::now(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            }),
        }
    }
}

/// Analyzer stub returning a fixed analysis and recording its inputs.
pub struct StubAnalyzer {
    pub result: AiAnalysis,
    pub calls: Mutex<Vec<(String, Vec<String>, Vec<String>)>>,
}

impl Default for StubAnalyzer {
    fn default() -> Self {
        Self {
            result: AiAnalysis {
                summary: "A new plan appeared".to_string(),
                intent: "Upselling".to_string(),
                suggestions: vec!["Review pricing".to_string()],
            },
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DiffAnalyzer for StubAnalyzer {
    async fn analyze(&self, site_name: &str, added: &[String], removed: &[String]) -> AiAnalysis {
        self.calls.lock().unwrap().push((
            site_name.to_string(),
            added.to_vec(),
            removed.to_vec(),
        ));
        self.result.clone()
    }
}

/// Notifier stub recording every dispatch.
#[derive(Default)]
pub struct RecordingNotifier {
    pub dispatches: Mutex<Vec<(NotificationPrefs, ChangeNotification)>>,
}

impl RecordingNotifier {
    pub fn dispatch_count(&self) -> usize {
        self.dispatches.lock().unwrap().len()
    }
}

#[async_trait]
impl ChangeNotifier for RecordingNotifier {
    async fn notify_change(
        &self,
        prefs: &NotificationPrefs,
        notification: &ChangeNotification,
    ) -> NotificationOutcome {
        self.dispatches
            .lock()
            .unwrap()
            .push((prefs.clone(), notification.clone()));
        NotificationOutcome {
            email: prefs.email_enabled,
            slack: prefs.slack_enabled,
        }
    }
}

pub fn make_profile(plan: &str) -> Profile {
    Profile {
        user_id: Uuid::new_v4(),
        email: "owner@example.com".to_string(),
        plan: plan.to_string(),
        notification_email: true,
        notification_slack: false,
        slack_webhook_url: None,
    }
}

pub fn make_site(user_id: Uuid, url: &str) -> MonitoredSite {
    let now = Utc::now();
    MonitoredSite {
        id: Uuid::new_v4(),
        user_id,
        url: url.to_string(),
        name: "Competitor".to_string(),
        is_active: true,
        last_checked_at: None,
        created_at: now,
        updated_at: now,
    }
}
