use async_trait::async_trait;

use pannon_core::AppResult;
use pannon_domain::{ApplicationId, PermissionSnapshot, UserId};

/// Repository port resolving effective access from the row store.
///
/// Join semantics: permissions and applications reachable through any of the
/// user's roles, deduplicated by identifier.
#[async_trait]
pub trait PermissionSnapshotRepository: Send + Sync {
    /// Loads the aggregated snapshot for one user.
    ///
    /// Returns `None` when the user is missing or soft-deleted.
    async fn load_snapshot(&self, user_id: UserId) -> AppResult<Option<PermissionSnapshot>>;

    /// Lists ids of active, not soft-deleted users, bounded by `limit`.
    async fn list_active_user_ids(&self, limit: usize) -> AppResult<Vec<UserId>>;

    /// Lists ids of users currently holding the named role.
    async fn list_user_ids_with_role(&self, role_name: &str) -> AppResult<Vec<UserId>>;

    /// Lists ids of users that reach the application through any role.
    async fn list_user_ids_for_application(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Vec<UserId>>;
}

/// Cache port for resolved snapshots, keyed by user id.
///
/// Operations are infallible: an entry that cannot be served is
/// indistinguishable from absent, and callers re-resolve on a miss.
#[async_trait]
pub trait PermissionSnapshotCache: Send + Sync {
    /// Returns the cached snapshot when present and fresh.
    ///
    /// An entry older than the TTL is purged and reported as a miss.
    async fn get(&self, user_id: UserId) -> Option<PermissionSnapshot>;

    /// Stores a snapshot, unconditionally replacing any existing entry.
    async fn set(&self, user_id: UserId, snapshot: PermissionSnapshot);

    /// Removes the entry for one user; returns whether one was removed.
    async fn invalidate(&self, user_id: UserId) -> bool;

    /// Removes entries for many users; returns how many were removed.
    async fn invalidate_many(&self, user_ids: &[UserId]) -> usize {
        let mut removed = 0;
        for user_id in user_ids {
            if self.invalidate(*user_id).await {
                removed += 1;
            }
        }
        removed
    }

    /// Drops every entry. Statistics counters are not affected.
    async fn clear(&self);

    /// Returns current size and effectiveness counters.
    async fn stats(&self) -> CacheStats;

    /// Zeroes the effectiveness counters without touching cached entries.
    async fn reset_stats(&self);
}

/// Point-in-time cache effectiveness counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently held, expired-but-unread included.
    pub size: usize,
    /// Reads served from the cache since the last reset.
    pub hits: u64,
    /// Reads that fell through to the row store since the last reset.
    pub misses: u64,
    /// Entries actually removed by invalidation since the last reset.
    pub invalidations: u64,
    /// `hits / (hits + misses)` formatted as a percentage, `"0.00%"` before
    /// any access.
    pub hit_rate: String,
}
