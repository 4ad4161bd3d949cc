//! Repository for the `pushed_assets` table.

use pushtrack_core::types::Timestamp;
use pushtrack_core::AssetType;
use sqlx::PgPool;

use crate::models::pushed_asset::PushedAssetRow;

const COLUMNS: &str = "id, bundle_id, asset_id, asset_type, environment_id, pushed_at";

/// Provides queries over the push history.
pub struct PushedAssetRepo;

impl PushedAssetRepo {
    /// Record a push.
    ///
    /// Returns `None` when the `(bundle, asset, environment)` triple was
    /// already recorded; the existing row is left untouched.
    pub async fn insert(
        pool: &PgPool,
        bundle_id: &str,
        asset_id: &str,
        asset_type: AssetType,
        environment_id: &str,
        pushed_at: Timestamp,
    ) -> Result<Option<PushedAssetRow>, sqlx::Error> {
        let query = format!(
            "INSERT INTO pushed_assets \
                (bundle_id, asset_id, asset_type, environment_id, pushed_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (bundle_id, asset_id, environment_id) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PushedAssetRow>(&query)
            .bind(bundle_id)
            .bind(asset_id)
            .bind(asset_type.as_str())
            .bind(environment_id)
            .bind(pushed_at)
            .fetch_optional(pool)
            .await
    }

    /// Most recent push of an asset to an environment, across bundles.
    pub async fn find_latest(
        pool: &PgPool,
        asset_id: &str,
        environment_id: &str,
    ) -> Result<Option<PushedAssetRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pushed_assets \
             WHERE asset_id = $1 AND environment_id = $2 \
             ORDER BY pushed_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, PushedAssetRow>(&query)
            .bind(asset_id)
            .bind(environment_id)
            .fetch_optional(pool)
            .await
    }

    /// Every push of an asset, most recent first.
    pub async fn list_by_asset(
        pool: &PgPool,
        asset_id: &str,
    ) -> Result<Vec<PushedAssetRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pushed_assets \
             WHERE asset_id = $1 \
             ORDER BY pushed_at DESC, id DESC"
        );
        sqlx::query_as::<_, PushedAssetRow>(&query)
            .bind(asset_id)
            .fetch_all(pool)
            .await
    }

    /// Every push recorded for a bundle.
    pub async fn list_by_bundle(
        pool: &PgPool,
        bundle_id: &str,
    ) -> Result<Vec<PushedAssetRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pushed_assets \
             WHERE bundle_id = $1 \
             ORDER BY asset_id, environment_id"
        );
        sqlx::query_as::<_, PushedAssetRow>(&query)
            .bind(bundle_id)
            .fetch_all(pool)
            .await
    }

    /// Drop a bundle's history, e.g. when the bundle is deleted. Returns the
    /// number of rows removed. Like every delete here, this bypasses the
    /// push cache.
    pub async fn delete_by_bundle(pool: &PgPool, bundle_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pushed_assets WHERE bundle_id = $1")
            .bind(bundle_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Drop everything pushed to an environment, e.g. when it is removed or
    /// reset. Returns the number of rows removed.
    pub async fn delete_by_environment(
        pool: &PgPool,
        environment_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pushed_assets WHERE environment_id = $1")
            .bind(environment_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Forget that an asset was pushed to an environment.
    ///
    /// Raw SQL: a `PushedAssetsCache` holding the pair keeps serving it. Go
    /// through `CachedPushHistory::delete_for_asset` when a cache is in use.
    pub async fn delete_by_asset_and_environment(
        pool: &PgPool,
        asset_id: &str,
        environment_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM pushed_assets WHERE asset_id = $1 AND environment_id = $2")
                .bind(asset_id)
                .bind(environment_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
