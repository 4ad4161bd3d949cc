//! Collaborator interfaces consumed by [`DependencySet`](crate::dependency_set::DependencySet).
//!
//! Each trait is implemented over Postgres in `pushtrack-db` and in memory
//! in [`memory`](crate::memory).

use std::sync::Arc;

use async_trait::async_trait;

use crate::bundle::{Bundle, Environment};
use crate::error::StoreError;
use crate::push::{NewPushRecord, PushRecord};
use crate::version::{Locale, VersionInfo};

/// Resolves the remote environments a bundle targets.
#[async_trait]
pub trait EnvironmentResolver: Send + Sync {
    async fn environments_for_bundle(&self, bundle_id: &str)
        -> Result<Vec<Environment>, StoreError>;
}

/// Reads bundle descriptors.
#[async_trait]
pub trait BundleLookup: Send + Sync {
    async fn bundle_by_id(&self, bundle_id: &str) -> Result<Option<Bundle>, StoreError>;
}

/// Read-only access to asset version timestamps.
#[async_trait]
pub trait VersionMetadataProvider: Send + Sync {
    /// All configured content locales.
    async fn locales(&self) -> Result<Vec<Locale>, StoreError>;

    /// Version row of one locale of a content asset.
    async fn content_version(
        &self,
        asset_id: &str,
        locale: &Locale,
    ) -> Result<Option<VersionInfo>, StoreError>;

    /// Version row of a non-localized asset (template, link, container, page).
    async fn asset_version(&self, asset_id: &str) -> Result<Option<VersionInfo>, StoreError>;
}

/// Persistent push log.
#[async_trait]
pub trait PushHistoryStore: Send + Sync {
    /// Most recent push of `asset_id` to `environment_id`.
    ///
    /// `Ok(None)` means nothing was pushed to this environment yet. Stores
    /// that cannot tell "no history" from a miss return
    /// [`StoreError::NotFound`].
    async fn latest_push_for(
        &self,
        asset_id: &str,
        environment_id: &str,
    ) -> Result<Option<PushRecord>, StoreError>;

    /// Every push of `asset_id`, across bundles and environments.
    async fn all_pushes_for(&self, asset_id: &str) -> Result<Vec<PushRecord>, StoreError>;

    /// Record a push. Returns `false` when the `(bundle, asset, environment)`
    /// triple was already recorded; the existing record is kept.
    async fn insert(&self, record: NewPushRecord) -> Result<bool, StoreError>;

    /// Forget every push of `asset_id` to `environment_id`, so the next
    /// conditional evaluation sends it again. Returns the records removed.
    async fn delete_for_asset(&self, asset_id: &str, environment_id: &str)
        -> Result<u64, StoreError>;

    /// Drop a bundle's history. Returns the records removed.
    async fn delete_by_bundle(&self, bundle_id: &str) -> Result<u64, StoreError>;

    /// Drop everything pushed to an environment. Returns the records removed.
    async fn delete_by_environment(&self, environment_id: &str) -> Result<u64, StoreError>;
}

/// Invalidatable side index of recent pushes keyed by asset + environment.
#[async_trait]
pub trait PushHistoryCache: Send + Sync {
    async fn invalidate(&self, asset_id: &str, environment_id: &str);
}

/// The collaborators an engine is built from.
#[derive(Clone)]
pub struct Collaborators {
    pub environments: Arc<dyn EnvironmentResolver>,
    pub bundles: Arc<dyn BundleLookup>,
    pub versions: Arc<dyn VersionMetadataProvider>,
    pub history: Arc<dyn PushHistoryStore>,
    pub cache: Arc<dyn PushHistoryCache>,
}
