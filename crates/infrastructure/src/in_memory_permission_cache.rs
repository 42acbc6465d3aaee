use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};
use tracing::debug;

use pannon_application::{CacheStats, PermissionSnapshotCache};
use pannon_domain::{PermissionSnapshot, UserId};

/// Snapshot entries stay valid for five minutes unless invalidated sooner.
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct SnapshotEntry {
    snapshot: PermissionSnapshot,
    stored_at: Instant,
}

/// In-memory TTL cache adapter for permission snapshots.
///
/// Expiry is lazy: an entry past its TTL is purged on the read that finds
/// it, and there is no background sweep. Stale-but-unread entries occupy
/// memory until next accessed; the key space is bounded by the user table.
pub struct InMemoryPermissionCache {
    entries: RwLock<HashMap<UserId, SnapshotEntry>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl InMemoryPermissionCache {
    /// Creates a cache with the default five-minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SNAPSHOT_TTL)
    }

    /// Creates a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }
}

impl Default for InMemoryPermissionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionSnapshotCache for InMemoryPermissionCache {
    async fn get(&self, user_id: UserId) -> Option<PermissionSnapshot> {
        {
            let entries = self.entries.read().await;
            match entries.get(&user_id) {
                Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.snapshot.clone());
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(&user_id)
            .is_some_and(|entry| entry.stored_at.elapsed() >= self.ttl)
        {
            entries.remove(&user_id);
            debug!(%user_id, "purged expired permission snapshot");
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn set(&self, user_id: UserId, snapshot: PermissionSnapshot) {
        self.entries.write().await.insert(
            user_id,
            SnapshotEntry {
                snapshot,
                stored_at: Instant::now(),
            },
        );
    }

    async fn invalidate(&self, user_id: UserId) -> bool {
        let removed = self.entries.write().await.remove(&user_id).is_some();
        if removed {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    async fn clear(&self) {
        self.entries.write().await.clear();
    }

    async fn stats(&self) -> CacheStats {
        let size = self.entries.read().await.len();
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);

        CacheStats {
            size,
            hits,
            misses,
            invalidations: self.invalidations.load(Ordering::Relaxed),
            hit_rate: format_hit_rate(hits, misses),
        }
    }

    async fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.invalidations.store(0, Ordering::Relaxed);
    }
}

fn format_hit_rate(hits: u64, misses: u64) -> String {
    let total = hits + misses;
    if total == 0 {
        return "0.00%".to_owned();
    }

    format!("{:.2}%", (hits as f64 / total as f64) * 100.0)
}
