use std::sync::Arc;

use pannon_core::AppResult;
use pannon_domain::{ApplicationId, PermissionSnapshot, UserId};
use tracing::debug;

use crate::access_ports::{CacheStats, PermissionSnapshotCache, PermissionSnapshotRepository};

/// Read-through access lookup for request authorization.
///
/// A cache hit is served directly; a miss resolves the snapshot from the
/// repository, stores it, and returns it. Construct once at process startup
/// and share by cloning.
#[derive(Clone)]
pub struct AccessService {
    repository: Arc<dyn PermissionSnapshotRepository>,
    cache: Arc<dyn PermissionSnapshotCache>,
}

impl AccessService {
    /// Creates a new access service from a repository and a cache.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PermissionSnapshotRepository>,
        cache: Arc<dyn PermissionSnapshotCache>,
    ) -> Self {
        Self { repository, cache }
    }

    /// Returns the user's snapshot, cached when fresh.
    ///
    /// An unknown user yields `Ok(None)`, never an error.
    pub async fn snapshot_for_user(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<PermissionSnapshot>> {
        if let Some(snapshot) = self.cache.get(user_id).await {
            return Ok(Some(snapshot));
        }

        let Some(snapshot) = self.repository.load_snapshot(user_id).await? else {
            return Ok(None);
        };

        self.cache.set(user_id, snapshot.clone()).await;
        Ok(Some(snapshot))
    }

    /// Returns whether the user currently holds the named permission.
    pub async fn has_permission(
        &self,
        user_id: UserId,
        permission_name: &str,
    ) -> AppResult<bool> {
        Ok(self
            .snapshot_for_user(user_id)
            .await?
            .is_some_and(|snapshot| snapshot.has_permission(permission_name)))
    }

    /// Returns whether the user can reach the application through any role.
    pub async fn can_access_application(
        &self,
        user_id: UserId,
        application_id: ApplicationId,
    ) -> AppResult<bool> {
        Ok(self
            .snapshot_for_user(user_id)
            .await?
            .is_some_and(|snapshot| snapshot.can_access_application(application_id)))
    }

    /// Drops one user's cached snapshot after a role or permission edit.
    pub async fn invalidate_user(&self, user_id: UserId) -> bool {
        let removed = self.cache.invalidate(user_id).await;
        if removed {
            debug!(%user_id, "invalidated cached permission snapshot");
        }
        removed
    }

    /// Drops cached snapshots for every affected user after a bulk edit.
    pub async fn invalidate_users(&self, user_ids: &[UserId]) -> usize {
        let removed = self.cache.invalidate_many(user_ids).await;
        if removed > 0 {
            debug!(removed, "invalidated cached permission snapshots");
        }
        removed
    }

    /// Drops every cached snapshot.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Returns cache effectiveness counters.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Zeroes cache effectiveness counters.
    pub async fn reset_cache_stats(&self) {
        self.cache.reset_stats().await;
    }
}
