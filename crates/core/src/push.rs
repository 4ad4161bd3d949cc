//! Push history records and the transient candidate passed to the engine.

use serde::{Deserialize, Serialize};

use crate::asset_type::AssetType;
use crate::types::{AssetId, BundleId, DbId, EnvironmentId, Timestamp};

/// A persisted fact: `asset_id` was sent to `environment_id` as part of
/// `bundle_id` at `pushed_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRecord {
    pub id: Option<DbId>,
    pub bundle_id: BundleId,
    pub asset_id: AssetId,
    pub asset_type: AssetType,
    pub environment_id: EnvironmentId,
    pub pushed_at: Timestamp,
}

impl PushRecord {
    /// Whether this record belongs to the given bundle/environment pair.
    pub fn matches(&self, bundle_id: &str, environment_id: &str) -> bool {
        self.bundle_id == bundle_id && self.environment_id == environment_id
    }
}

/// DTO for inserting a push record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPushRecord {
    pub bundle_id: BundleId,
    pub asset_id: AssetId,
    pub asset_type: AssetType,
    pub environment_id: EnvironmentId,
    pub pushed_at: Timestamp,
}

impl NewPushRecord {
    pub fn into_record(self, id: Option<DbId>) -> PushRecord {
        PushRecord {
            id,
            bundle_id: self.bundle_id,
            asset_id: self.asset_id,
            asset_type: self.asset_type,
            environment_id: self.environment_id,
            pushed_at: self.pushed_at,
        }
    }
}

/// A candidate handed to the engine by the publish pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCandidate {
    pub asset_id: AssetId,
    pub asset_type: AssetType,
    #[serde(default)]
    pub mod_date: Option<Timestamp>,
}
