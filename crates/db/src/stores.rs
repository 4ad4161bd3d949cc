//! Postgres implementations of the core collaborator traits.

use std::sync::Arc;

use async_trait::async_trait;
use pushtrack_core::ports::{
    BundleLookup, EnvironmentResolver, PushHistoryStore, VersionMetadataProvider,
};
use pushtrack_core::{
    Bundle, CachedPushHistory, Collaborators, Environment, Locale, NewPushRecord,
    PushRecord, PushedAssetsCache, StoreError, VersionInfo,
};

use crate::repositories::{BundleRepo, EnvironmentRepo, PushedAssetRepo, VersionInfoRepo};
use crate::{store_error, DbPool};

/// Push history backed by `pushed_assets`.
#[derive(Clone)]
pub struct PgPushHistory {
    pool: DbPool,
}

impl PgPushHistory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PushHistoryStore for PgPushHistory {
    async fn latest_push_for(
        &self,
        asset_id: &str,
        environment_id: &str,
    ) -> Result<Option<PushRecord>, StoreError> {
        PushedAssetRepo::find_latest(&self.pool, asset_id, environment_id)
            .await
            .map_err(store_error)?
            .map(PushRecord::try_from)
            .transpose()
    }

    async fn all_pushes_for(&self, asset_id: &str) -> Result<Vec<PushRecord>, StoreError> {
        PushedAssetRepo::list_by_asset(&self.pool, asset_id)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(PushRecord::try_from)
            .collect()
    }

    async fn insert(&self, record: NewPushRecord) -> Result<bool, StoreError> {
        let inserted = PushedAssetRepo::insert(
            &self.pool,
            &record.bundle_id,
            &record.asset_id,
            record.asset_type,
            &record.environment_id,
            record.pushed_at,
        )
        .await
        .map_err(store_error)?;

        if inserted.is_none() {
            tracing::debug!(
                bundle_id = %record.bundle_id,
                asset_id = %record.asset_id,
                environment_id = %record.environment_id,
                "Push already recorded"
            );
        }
        Ok(inserted.is_some())
    }

    async fn delete_for_asset(
        &self,
        asset_id: &str,
        environment_id: &str,
    ) -> Result<u64, StoreError> {
        PushedAssetRepo::delete_by_asset_and_environment(&self.pool, asset_id, environment_id)
            .await
            .map_err(store_error)
    }

    async fn delete_by_bundle(&self, bundle_id: &str) -> Result<u64, StoreError> {
        PushedAssetRepo::delete_by_bundle(&self.pool, bundle_id)
            .await
            .map_err(store_error)
    }

    async fn delete_by_environment(&self, environment_id: &str) -> Result<u64, StoreError> {
        PushedAssetRepo::delete_by_environment(&self.pool, environment_id)
            .await
            .map_err(store_error)
    }
}

/// Bundles and their environments.
#[derive(Clone)]
pub struct PgDirectory {
    pool: DbPool,
}

impl PgDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnvironmentResolver for PgDirectory {
    async fn environments_for_bundle(
        &self,
        bundle_id: &str,
    ) -> Result<Vec<Environment>, StoreError> {
        let rows = EnvironmentRepo::list_by_bundle(&self.pool, bundle_id)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Environment::from).collect())
    }
}

#[async_trait]
impl BundleLookup for PgDirectory {
    async fn bundle_by_id(&self, bundle_id: &str) -> Result<Option<Bundle>, StoreError> {
        let row = BundleRepo::find_by_id(&self.pool, bundle_id)
            .await
            .map_err(store_error)?;
        Ok(row.map(Bundle::from))
    }
}

/// Version timestamps and content languages.
#[derive(Clone)]
pub struct PgVersionMetadata {
    pool: DbPool,
}

impl PgVersionMetadata {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionMetadataProvider for PgVersionMetadata {
    async fn locales(&self) -> Result<Vec<Locale>, StoreError> {
        let rows = VersionInfoRepo::list_languages(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Locale::from).collect())
    }

    async fn content_version(
        &self,
        asset_id: &str,
        locale: &Locale,
    ) -> Result<Option<VersionInfo>, StoreError> {
        let row = VersionInfoRepo::find_content_version(&self.pool, asset_id, locale.id)
            .await
            .map_err(store_error)?;
        Ok(row.map(VersionInfo::from))
    }

    async fn asset_version(&self, asset_id: &str) -> Result<Option<VersionInfo>, StoreError> {
        let row = VersionInfoRepo::find_asset_version(&self.pool, asset_id)
            .await
            .map_err(store_error)?;
        Ok(row.map(VersionInfo::from))
    }
}

/// Wire every collaborator to `pool`, with the push history fronted by
/// `cache`. The same cache receives the engine's unpublish invalidations.
pub fn collaborators(pool: DbPool, cache: Arc<PushedAssetsCache>) -> Collaborators {
    let directory = Arc::new(PgDirectory::new(pool.clone()));
    let history = Arc::new(CachedPushHistory::new(
        Arc::new(PgPushHistory::new(pool.clone())),
        cache.clone(),
    ));
    Collaborators {
        environments: directory.clone(),
        bundles: directory,
        versions: Arc::new(PgVersionMetadata::new(pool)),
        history,
        cache,
    }
}
