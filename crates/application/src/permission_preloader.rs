use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{info, warn};

use pannon_core::AppResult;
use pannon_domain::{ApplicationId, PermissionSnapshot, UserId};

use crate::access_ports::{PermissionSnapshotCache, PermissionSnapshotRepository};

/// Default number of users resolved concurrently during bulk preloads.
///
/// Batching exists only to bound the number of simultaneous in-flight
/// row-store queries.
pub const DEFAULT_PRELOAD_BATCH_SIZE: usize = 100;

/// Warms the snapshot cache ahead of demand for known-important user sets.
///
/// Individual lookup failures are logged and skipped; a bulk preload never
/// aborts because of one bad user record and reports a best-effort count.
#[derive(Clone)]
pub struct PermissionPreloader {
    repository: Arc<dyn PermissionSnapshotRepository>,
    cache: Arc<dyn PermissionSnapshotCache>,
    batch_size: usize,
}

impl PermissionPreloader {
    /// Creates a preloader with the default batch size.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PermissionSnapshotRepository>,
        cache: Arc<dyn PermissionSnapshotCache>,
    ) -> Self {
        Self {
            repository,
            cache,
            batch_size: DEFAULT_PRELOAD_BATCH_SIZE,
        }
    }

    /// Overrides the bulk preload batch size; values below one are clamped.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Resolves and caches one user's snapshot.
    ///
    /// Returns `None` without touching the cache when the user does not
    /// exist or the row-store lookup fails; failures are logged, not
    /// propagated.
    pub async fn preload_user(&self, user_id: UserId) -> Option<PermissionSnapshot> {
        let snapshot = match self.repository.load_snapshot(user_id).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return None,
            Err(error) => {
                warn!(%user_id, %error, "skipping snapshot preload for user");
                return None;
            }
        };

        self.cache.set(user_id, snapshot.clone()).await;
        Some(snapshot)
    }

    /// Preloads many users concurrently.
    ///
    /// Returns only the successfully cached snapshots; ids that failed or
    /// were not found are omitted from the map.
    pub async fn preload_users(
        &self,
        user_ids: &[UserId],
    ) -> HashMap<UserId, PermissionSnapshot> {
        let mut tasks = JoinSet::new();
        for user_id in user_ids.iter().copied() {
            let preloader = self.clone();
            tasks.spawn(async move { (user_id, preloader.preload_user(user_id).await) });
        }

        let mut snapshots = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((user_id, Some(snapshot))) => {
                    snapshots.insert(user_id, snapshot);
                }
                Ok((_, None)) => {}
                Err(error) => warn!(%error, "snapshot preload task failed"),
            }
        }

        snapshots
    }

    /// Warms snapshots for active, not soft-deleted users, up to `limit`.
    ///
    /// Returns the number of distinct users successfully cached.
    pub async fn preload_all_active(&self, limit: usize) -> AppResult<usize> {
        let started = Instant::now();
        let user_ids = self.repository.list_active_user_ids(limit).await?;
        let cached = self.preload_in_batches(&user_ids).await;

        info!(
            cached,
            candidates = user_ids.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "bulk snapshot preload finished"
        );
        Ok(cached)
    }

    /// Warms snapshots for every user holding the named role.
    pub async fn preload_by_role(&self, role_name: &str) -> AppResult<usize> {
        let user_ids = self.repository.list_user_ids_with_role(role_name).await?;
        Ok(self.preload_in_batches(&user_ids).await)
    }

    /// Warms snapshots for every user that can reach the application.
    pub async fn preload_by_application(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<usize> {
        let user_ids = self
            .repository
            .list_user_ids_for_application(application_id)
            .await?;
        Ok(self.preload_in_batches(&user_ids).await)
    }

    async fn preload_in_batches(&self, user_ids: &[UserId]) -> usize {
        let mut cached = 0;
        for batch in user_ids.chunks(self.batch_size) {
            cached += self.preload_users(batch).await.len();
        }
        cached
    }
}
