//! In-process push history cache.
//!
//! [`PushedAssetsCache`] keeps the most recent [`PushRecord`] per
//! asset + environment. [`CachedPushHistory`] puts it in front of any
//! [`PushHistoryStore`]: lookups are answered from the cache when possible,
//! inserts are written through and deletes evict the affected entries.
//! History deleted behind its back stays visible until invalidated.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::ports::{PushHistoryCache, PushHistoryStore};
use crate::push::{NewPushRecord, PushRecord};

type CacheKey = (String, String);

fn key(asset_id: &str, environment_id: &str) -> CacheKey {
    (asset_id.to_string(), environment_id.to_string())
}

/// Latest known push per asset + environment.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across engines.
#[derive(Default)]
pub struct PushedAssetsCache {
    entries: RwLock<HashMap<CacheKey, PushRecord>>,
}

impl PushedAssetsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, asset_id: &str, environment_id: &str) -> Option<PushRecord> {
        self.entries
            .read()
            .await
            .get(&key(asset_id, environment_id))
            .cloned()
    }

    /// Store `record` unless a more recent push is already cached.
    pub async fn put(&self, record: PushRecord) {
        let mut entries = self.entries.write().await;
        let k = key(&record.asset_id, &record.environment_id);
        match entries.get(&k) {
            Some(existing) if existing.pushed_at > record.pushed_at => {}
            _ => {
                entries.insert(k, record);
            }
        }
    }

    /// Drop the entry for `asset_id` in `environment_id`. Returns `true` if
    /// an entry was present.
    pub async fn remove(&self, asset_id: &str, environment_id: &str) -> bool {
        self.entries
            .write()
            .await
            .remove(&key(asset_id, environment_id))
            .is_some()
    }

    /// Drop every entry whose cached push belongs to `bundle_id`.
    pub async fn remove_bundle(&self, bundle_id: &str) -> usize {
        self.remove_where(|r| r.bundle_id == bundle_id).await
    }

    /// Drop every entry for `environment_id`.
    pub async fn remove_environment(&self, environment_id: &str) -> usize {
        self.remove_where(|r| r.environment_id == environment_id).await
    }

    async fn remove_where(&self, matches: impl Fn(&PushRecord) -> bool) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, r| !matches(r));
        before - entries.len()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl PushHistoryCache for PushedAssetsCache {
    async fn invalidate(&self, asset_id: &str, environment_id: &str) {
        if self.remove(asset_id, environment_id).await {
            tracing::debug!(asset_id, environment_id, "Push cache entry invalidated");
        }
    }
}

/// A [`PushHistoryStore`] fronted by a [`PushedAssetsCache`].
pub struct CachedPushHistory {
    store: Arc<dyn PushHistoryStore>,
    cache: Arc<PushedAssetsCache>,
}

impl CachedPushHistory {
    pub fn new(store: Arc<dyn PushHistoryStore>, cache: Arc<PushedAssetsCache>) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &Arc<PushedAssetsCache> {
        &self.cache
    }
}

#[async_trait]
impl PushHistoryStore for CachedPushHistory {
    async fn latest_push_for(
        &self,
        asset_id: &str,
        environment_id: &str,
    ) -> Result<Option<PushRecord>, StoreError> {
        if let Some(hit) = self.cache.get(asset_id, environment_id).await {
            return Ok(Some(hit));
        }
        let found = self.store.latest_push_for(asset_id, environment_id).await?;
        if let Some(record) = &found {
            self.cache.put(record.clone()).await;
        }
        Ok(found)
    }

    async fn all_pushes_for(&self, asset_id: &str) -> Result<Vec<PushRecord>, StoreError> {
        self.store.all_pushes_for(asset_id).await
    }

    async fn insert(&self, record: NewPushRecord) -> Result<bool, StoreError> {
        let inserted = self.store.insert(record.clone()).await?;
        if inserted {
            self.cache.put(record.into_record(None)).await;
        } else {
            // Someone else recorded it first; let the next lookup read theirs.
            self.cache.remove(&record.asset_id, &record.environment_id).await;
        }
        Ok(inserted)
    }

    async fn delete_for_asset(
        &self,
        asset_id: &str,
        environment_id: &str,
    ) -> Result<u64, StoreError> {
        let removed = self.store.delete_for_asset(asset_id, environment_id).await?;
        self.cache.invalidate(asset_id, environment_id).await;
        Ok(removed)
    }

    async fn delete_by_bundle(&self, bundle_id: &str) -> Result<u64, StoreError> {
        let removed = self.store.delete_by_bundle(bundle_id).await?;
        let evicted = self.cache.remove_bundle(bundle_id).await;
        tracing::debug!(bundle_id, removed, evicted, "Bundle push history deleted");
        Ok(removed)
    }

    async fn delete_by_environment(&self, environment_id: &str) -> Result<u64, StoreError> {
        let removed = self.store.delete_by_environment(environment_id).await?;
        let evicted = self.cache.remove_environment(environment_id).await;
        tracing::debug!(environment_id, removed, evicted, "Environment push history deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::asset_type::AssetType;
    use crate::memory::InMemoryPushHistory;

    fn new_record(asset: &str, env: &str) -> NewPushRecord {
        NewPushRecord {
            bundle_id: "bundle-1".to_string(),
            asset_id: asset.to_string(),
            asset_type: AssetType::Content,
            environment_id: env.to_string(),
            pushed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn put_keeps_the_most_recent_push() {
        let cache = PushedAssetsCache::new();
        let newer = new_record("a1", "e1").into_record(Some(2));
        let mut older = newer.clone();
        older.id = Some(1);
        older.pushed_at = newer.pushed_at - Duration::minutes(10);

        cache.put(newer.clone()).await;
        cache.put(older).await;

        assert_eq!(cache.get("a1", "e1").await, Some(newer));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn invalidate_removes_only_the_given_pair() {
        let cache = PushedAssetsCache::new();
        cache.put(new_record("a1", "e1").into_record(None)).await;
        cache.put(new_record("a1", "e2").into_record(None)).await;

        cache.invalidate("a1", "e1").await;

        assert!(cache.get("a1", "e1").await.is_none());
        assert!(cache.get("a1", "e2").await.is_some());

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn inserts_are_written_through() {
        let store = Arc::new(InMemoryPushHistory::new());
        let cache = Arc::new(PushedAssetsCache::new());
        let cached = CachedPushHistory::new(store.clone(), cache.clone());

        assert!(cached.insert(new_record("a1", "e1")).await.unwrap());

        assert_eq!(store.records().await.len(), 1);
        assert!(cache.get("a1", "e1").await.is_some());
    }

    #[tokio::test]
    async fn duplicate_insert_keeps_the_stored_push() {
        let store = Arc::new(InMemoryPushHistory::new());
        let cache = Arc::new(PushedAssetsCache::new());
        let cached = CachedPushHistory::new(store.clone(), cache.clone());

        let mut first = new_record("a1", "e1");
        first.pushed_at = Utc::now() - Duration::hours(1);
        store.insert(first.clone()).await.unwrap();

        assert!(!cached.insert(new_record("a1", "e1")).await.unwrap());
        assert!(cache.get("a1", "e1").await.is_none());

        let latest = cached.latest_push_for("a1", "e1").await.unwrap().unwrap();
        assert_eq!(latest.pushed_at, first.pushed_at);
    }

    #[tokio::test]
    async fn lookups_fill_the_cache_and_invalidation_falls_through() {
        let store = Arc::new(InMemoryPushHistory::new());
        store.insert(new_record("a1", "e1")).await.unwrap();
        let cache = Arc::new(PushedAssetsCache::new());
        let cached = CachedPushHistory::new(store.clone(), cache.clone());

        assert!(cache.is_empty().await);
        let first = cached.latest_push_for("a1", "e1").await.unwrap();
        assert!(first.is_some());
        assert_eq!(cache.len().await, 1);

        cache.invalidate("a1", "e1").await;
        assert!(cache.is_empty().await);
        assert!(cached.latest_push_for("a1", "e1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deletes_evict_cached_pushes() {
        let store = Arc::new(InMemoryPushHistory::new());
        let cache = Arc::new(PushedAssetsCache::new());
        let cached = CachedPushHistory::new(store.clone(), cache.clone());
        cached.insert(new_record("a1", "e1")).await.unwrap();
        cached.insert(new_record("a1", "e2")).await.unwrap();
        cached.insert(new_record("a2", "e2")).await.unwrap();
        let mut other = new_record("a3", "e3");
        other.bundle_id = "bundle-2".to_string();
        cached.insert(other).await.unwrap();

        assert_eq!(cached.delete_for_asset("a1", "e1").await.unwrap(), 1);
        assert!(cached.latest_push_for("a1", "e1").await.unwrap().is_none());

        assert_eq!(cached.delete_by_environment("e2").await.unwrap(), 2);
        assert!(cached.latest_push_for("a1", "e2").await.unwrap().is_none());
        assert!(cached.latest_push_for("a2", "e2").await.unwrap().is_none());

        assert_eq!(cached.delete_by_bundle("bundle-2").await.unwrap(), 1);
        assert!(cached.latest_push_for("a3", "e3").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }
}
