//! Push history rows.

use pushtrack_core::types::{DbId, Timestamp};
use pushtrack_core::{AssetType, PushRecord, StoreError};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `pushed_assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PushedAssetRow {
    pub id: DbId,
    pub bundle_id: String,
    pub asset_id: String,
    pub asset_type: String,
    pub environment_id: String,
    pub pushed_at: Timestamp,
}

impl TryFrom<PushedAssetRow> for PushRecord {
    type Error = StoreError;

    fn try_from(row: PushedAssetRow) -> Result<Self, Self::Error> {
        let asset_type: AssetType = row
            .asset_type
            .parse()
            .map_err(|e: pushtrack_core::CoreError| StoreError::Data(e.to_string()))?;
        Ok(PushRecord {
            id: Some(row.id),
            bundle_id: row.bundle_id,
            asset_id: row.asset_id,
            asset_type,
            environment_id: row.environment_id,
            pushed_at: row.pushed_at,
        })
    }
}
