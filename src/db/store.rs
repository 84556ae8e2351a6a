use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::db::models::{ActiveSite, MonitoredSite, NewCheckRecord, Profile, SiteSnapshot};
use crate::db::services::{history_service, profile_service, site_service, snapshot_service};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Other(String),
}

/// Persistence port for the check pipeline. The orchestrator receives this
/// as an injected dependency, so checks can run against an in-memory store
/// in tests.
#[async_trait]
pub trait CheckStore: Send + Sync {
    async fn get_site(&self, site_id: Uuid) -> Result<Option<MonitoredSite>, StoreError>;

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;

    async fn get_snapshot(&self, site_id: Uuid) -> Result<Option<SiteSnapshot>, StoreError>;

    async fn upsert_snapshot(
        &self,
        site_id: Uuid,
        content: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn mark_site_checked(&self, site_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;

    async fn append_check_record(&self, record: &NewCheckRecord) -> Result<(), StoreError>;

    /// Number of checks executed for any of the user's sites since `since`.
    async fn count_checks_for_user_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError>;

    /// Active sites joined with the owner's notification preferences.
    async fn list_active_sites(&self) -> Result<Vec<ActiveSite>, StoreError>;
}

/// Postgres-backed store delegating to the db service functions.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckStore for PgStore {
    async fn get_site(&self, site_id: Uuid) -> Result<Option<MonitoredSite>, StoreError> {
        Ok(site_service::get_site_by_id(&self.pool, site_id).await?)
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(profile_service::get_profile(&self.pool, user_id).await?)
    }

    async fn get_snapshot(&self, site_id: Uuid) -> Result<Option<SiteSnapshot>, StoreError> {
        Ok(snapshot_service::get_snapshot(&self.pool, site_id).await?)
    }

    async fn upsert_snapshot(
        &self,
        site_id: Uuid,
        content: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        Ok(snapshot_service::upsert_snapshot(&self.pool, site_id, content, fetched_at).await?)
    }

    async fn mark_site_checked(&self, site_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        Ok(site_service::mark_site_checked(&self.pool, site_id, at).await?)
    }

    async fn append_check_record(&self, record: &NewCheckRecord) -> Result<(), StoreError> {
        history_service::append_check_record(&self.pool, record).await?;
        Ok(())
    }

    async fn count_checks_for_user_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        Ok(history_service::count_checks_for_user_since(&self.pool, user_id, since).await?)
    }

    async fn list_active_sites(&self) -> Result<Vec<ActiveSite>, StoreError> {
        Ok(site_service::list_active_sites_with_prefs(&self.pool).await?)
    }
}
