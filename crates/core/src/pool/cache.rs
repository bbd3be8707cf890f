//! Process-local snapshot cache keyed by window id.
//!
//! Entries are never removed. Staleness is decided lazily by the reader via
//! [`CacheEntry::is_usable`]; the cache itself validates nothing.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::pool::PoolSnapshot;
use crate::types::Timestamp;
use crate::window::WindowId;

/// A cached snapshot and the reset boundary at which it goes stale.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub snapshot: PoolSnapshot,
    pub expires_at: Timestamp,
}

impl CacheEntry {
    /// Usable only before expiry and only when the snapshot is complete.
    pub fn is_usable(&self, now: Timestamp, expected: usize) -> bool {
        now < self.expires_at && self.snapshot.is_complete(expected)
    }
}

/// In-memory map from window id to the last snapshot obtained for it.
///
/// Thread-safe via interior `RwLock`; shared by the resolver that owns it.
#[derive(Debug, Default)]
pub struct PoolCache {
    entries: RwLock<HashMap<WindowId, CacheEntry>>,
}

impl PoolCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, window_id: &WindowId) -> Option<CacheEntry> {
        self.entries.read().await.get(window_id).cloned()
    }

    /// Insert or overwrite the entry for `window_id`.
    pub async fn put(&self, window_id: WindowId, snapshot: PoolSnapshot, expires_at: Timestamp) {
        self.entries.write().await.insert(
            window_id,
            CacheEntry {
                snapshot,
                expires_at,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use serde_json::json;

    use crate::window::{PoolWindow, WeekWindow};

    fn snapshot(n: usize) -> PoolSnapshot {
        PoolSnapshot::new(
            PoolWindow::Week(WeekWindow::new(2025, 1)),
            (0..n).map(|i| json!({ "region": i })).collect(),
        )
    }

    #[tokio::test]
    async fn get_returns_what_was_put() {
        let cache = PoolCache::new();
        let id = WeekWindow::new(2025, 1).id();
        let expires_at = Utc.with_ymd_and_hms(2025, 1, 10, 19, 0, 0).unwrap();

        assert!(cache.get(&id).await.is_none());
        cache.put(id.clone(), snapshot(5), expires_at).await;

        let entry = cache.get(&id).await.unwrap();
        assert_eq!(entry.snapshot.entries.len(), 5);
        assert_eq!(entry.expires_at, expires_at);
    }

    #[tokio::test]
    async fn put_overwrites_existing_entry() {
        let cache = PoolCache::new();
        let id = WeekWindow::new(2025, 1).id();
        let expires_at = Utc.with_ymd_and_hms(2025, 1, 10, 19, 0, 0).unwrap();

        cache.put(id.clone(), snapshot(3), expires_at).await;
        cache.put(id.clone(), snapshot(5), expires_at).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&id).await.unwrap().snapshot.entries.len(), 5);
    }

    #[test]
    fn usability_needs_freshness_and_completeness() {
        let expires_at = Utc.with_ymd_and_hms(2025, 1, 10, 19, 0, 0).unwrap();
        let before = expires_at - TimeDelta::seconds(1);

        let fresh = CacheEntry {
            snapshot: snapshot(5),
            expires_at,
        };
        assert!(fresh.is_usable(before, 5));
        assert!(!fresh.is_usable(expires_at, 5), "expiry instant is exclusive");

        let partial = CacheEntry {
            snapshot: snapshot(2),
            expires_at,
        };
        assert!(!partial.is_usable(before, 5));
    }
}
