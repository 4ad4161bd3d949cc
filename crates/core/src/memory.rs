//! In-memory collaborators.
//!
//! Used by embedders without a database and by the engine's tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::bundle::{Bundle, Environment};
use crate::error::StoreError;
use crate::ports::{BundleLookup, EnvironmentResolver, PushHistoryStore, VersionMetadataProvider};
use crate::push::{NewPushRecord, PushRecord};
use crate::types::{DbId, LocaleId};
use crate::version::{Locale, VersionInfo};

// ---------------------------------------------------------------------------
// Push history
// ---------------------------------------------------------------------------

#[derive(Default)]
struct HistoryState {
    records: Vec<PushRecord>,
    next_id: DbId,
}

/// Push log kept in a `Vec`. Duplicate triples are ignored under the write
/// lock, so concurrent engines cannot double-record.
#[derive(Default)]
pub struct InMemoryPushHistory {
    state: RwLock<HistoryState>,
}

impl InMemoryPushHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record, in insertion order.
    pub async fn records(&self) -> Vec<PushRecord> {
        self.state.read().await.records.clone()
    }

    /// Records for one `(bundle, asset, environment)` triple.
    pub async fn count_for(&self, bundle_id: &str, asset_id: &str, environment_id: &str) -> usize {
        self.state
            .read()
            .await
            .records
            .iter()
            .filter(|r| r.asset_id == asset_id && r.matches(bundle_id, environment_id))
            .count()
    }

    pub async fn clear(&self) {
        self.state.write().await.records.clear();
    }

    async fn remove_where(&self, matches: impl Fn(&PushRecord) -> bool) -> u64 {
        let mut state = self.state.write().await;
        let before = state.records.len();
        state.records.retain(|r| !matches(r));
        (before - state.records.len()) as u64
    }
}

#[async_trait]
impl PushHistoryStore for InMemoryPushHistory {
    async fn latest_push_for(
        &self,
        asset_id: &str,
        environment_id: &str,
    ) -> Result<Option<PushRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .records
            .iter()
            .filter(|r| r.asset_id == asset_id && r.environment_id == environment_id)
            .max_by_key(|r| r.pushed_at)
            .cloned())
    }

    async fn all_pushes_for(&self, asset_id: &str) -> Result<Vec<PushRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .records
            .iter()
            .filter(|r| r.asset_id == asset_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, record: NewPushRecord) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let duplicate = state.records.iter().any(|r| {
            r.asset_id == record.asset_id && r.matches(&record.bundle_id, &record.environment_id)
        });
        if duplicate {
            return Ok(false);
        }
        state.next_id += 1;
        let id = state.next_id;
        state.records.push(record.into_record(Some(id)));
        Ok(true)
    }

    async fn delete_for_asset(
        &self,
        asset_id: &str,
        environment_id: &str,
    ) -> Result<u64, StoreError> {
        Ok(self
            .remove_where(|r| r.asset_id == asset_id && r.environment_id == environment_id)
            .await)
    }

    async fn delete_by_bundle(&self, bundle_id: &str) -> Result<u64, StoreError> {
        Ok(self.remove_where(|r| r.bundle_id == bundle_id).await)
    }

    async fn delete_by_environment(&self, environment_id: &str) -> Result<u64, StoreError> {
        Ok(self.remove_where(|r| r.environment_id == environment_id).await)
    }
}

// ---------------------------------------------------------------------------
// Bundles and environments
// ---------------------------------------------------------------------------

/// Bundles and their target environments.
#[derive(Default)]
pub struct InMemoryDirectory {
    bundles: RwLock<HashMap<String, Bundle>>,
    targets: RwLock<HashMap<String, Vec<Environment>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_bundle(&self, bundle: Bundle) {
        self.bundles.write().await.insert(bundle.id.clone(), bundle);
    }

    /// Attach `environment` to `bundle_id`, keeping attach order.
    pub async fn attach(&self, bundle_id: &str, environment: Environment) {
        let mut targets = self.targets.write().await;
        let list = targets.entry(bundle_id.to_string()).or_default();
        if !list.iter().any(|e| e.id == environment.id) {
            list.push(environment);
        }
    }
}

#[async_trait]
impl EnvironmentResolver for InMemoryDirectory {
    async fn environments_for_bundle(
        &self,
        bundle_id: &str,
    ) -> Result<Vec<Environment>, StoreError> {
        Ok(self
            .targets
            .read()
            .await
            .get(bundle_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl BundleLookup for InMemoryDirectory {
    async fn bundle_by_id(&self, bundle_id: &str) -> Result<Option<Bundle>, StoreError> {
        Ok(self.bundles.read().await.get(bundle_id).cloned())
    }
}

// ---------------------------------------------------------------------------
// Version metadata
// ---------------------------------------------------------------------------

/// Version rows keyed by asset id (and locale for content).
#[derive(Default)]
pub struct InMemoryVersions {
    locales: RwLock<Vec<Locale>>,
    content: RwLock<HashMap<(String, LocaleId), VersionInfo>>,
    assets: RwLock<HashMap<String, VersionInfo>>,
}

impl InMemoryVersions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_locale(&self, id: LocaleId, code: impl Into<String>) {
        self.locales.write().await.push(Locale {
            id,
            code: code.into(),
        });
    }

    pub async fn set_content_version(&self, asset_id: &str, locale: LocaleId, info: VersionInfo) {
        self.content
            .write()
            .await
            .insert((asset_id.to_string(), locale), info);
    }

    pub async fn set_asset_version(&self, asset_id: &str, info: VersionInfo) {
        self.assets.write().await.insert(asset_id.to_string(), info);
    }
}

#[async_trait]
impl VersionMetadataProvider for InMemoryVersions {
    async fn locales(&self) -> Result<Vec<Locale>, StoreError> {
        Ok(self.locales.read().await.clone())
    }

    async fn content_version(
        &self,
        asset_id: &str,
        locale: &Locale,
    ) -> Result<Option<VersionInfo>, StoreError> {
        Ok(self
            .content
            .read()
            .await
            .get(&(asset_id.to_string(), locale.id))
            .cloned())
    }

    async fn asset_version(&self, asset_id: &str) -> Result<Option<VersionInfo>, StoreError> {
        Ok(self.assets.read().await.get(asset_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::asset_type::AssetType;

    fn push(bundle: &str, env: &str, minutes_ago: i64) -> NewPushRecord {
        NewPushRecord {
            bundle_id: bundle.to_string(),
            asset_id: "a1".to_string(),
            asset_type: AssetType::Template,
            environment_id: env.to_string(),
            pushed_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn latest_push_picks_most_recent_for_environment() {
        let store = InMemoryPushHistory::new();
        store.insert(push("b1", "e1", 30)).await.unwrap();
        store.insert(push("b2", "e1", 5)).await.unwrap();
        store.insert(push("b3", "e2", 1)).await.unwrap();

        let latest = store.latest_push_for("a1", "e1").await.unwrap().unwrap();
        assert_eq!(latest.bundle_id, "b2");
        assert!(store.latest_push_for("a1", "e3").await.unwrap().is_none());
        assert_eq!(store.all_pushes_for("a1").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn duplicate_triples_are_ignored() {
        let store = InMemoryPushHistory::new();
        assert!(store.insert(push("b1", "e1", 10)).await.unwrap());
        assert!(!store.insert(push("b1", "e1", 0)).await.unwrap());

        assert_eq!(store.count_for("b1", "a1", "e1").await, 1);
    }

    #[tokio::test]
    async fn deletes_remove_matching_records() {
        let store = InMemoryPushHistory::new();
        store.insert(push("b1", "e1", 30)).await.unwrap();
        store.insert(push("b1", "e2", 20)).await.unwrap();
        store.insert(push("b2", "e1", 10)).await.unwrap();
        store.insert(push("b3", "e3", 5)).await.unwrap();

        assert_eq!(store.delete_for_asset("a1", "e3").await.unwrap(), 1);
        assert_eq!(store.delete_by_bundle("b1").await.unwrap(), 2);
        assert_eq!(store.delete_by_environment("e1").await.unwrap(), 1);
        assert_eq!(store.delete_by_environment("e1").await.unwrap(), 0);
        assert!(store.records().await.is_empty());
    }

    #[tokio::test]
    async fn directory_keeps_attach_order_without_duplicates() {
        let dir = InMemoryDirectory::new();
        dir.attach("b1", Environment::new("e2", "Staging")).await;
        dir.attach("b1", Environment::new("e1", "Production")).await;
        dir.attach("b1", Environment::new("e2", "Staging")).await;

        let ids: Vec<_> = dir
            .environments_for_bundle("b1")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["e2", "e1"]);
        assert!(dir.environments_for_bundle("missing").await.unwrap().is_empty());
        assert!(dir.bundle_by_id("missing").await.unwrap().is_none());
    }
}
