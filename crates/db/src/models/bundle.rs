//! Bundle rows.

use pushtrack_core::types::Timestamp;
use pushtrack_core::Bundle;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bundles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BundleRow {
    pub id: String,
    pub name: String,
    pub force_push: bool,
    pub publish_date: Option<Timestamp>,
    pub expire_date: Option<Timestamp>,
    pub owner: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a bundle.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBundle {
    pub id: String,
    pub name: String,
    pub force_push: bool,
    pub publish_date: Option<Timestamp>,
    pub expire_date: Option<Timestamp>,
    pub owner: Option<String>,
}

impl From<BundleRow> for Bundle {
    fn from(row: BundleRow) -> Self {
        Bundle {
            id: row.id,
            name: row.name,
            force_push: row.force_push,
            publish_date: row.publish_date,
            expire_date: row.expire_date,
            owner: row.owner,
        }
    }
}
