//! Push dependency decision engine.
//!
//! A [`DependencySet`] is built once per bundle operation (bundle, asset
//! type, mode). Every candidate asset is run through
//! [`evaluate`](DependencySet::evaluate), which decides whether the asset
//! must travel to at least one of the bundle's environments, records the
//! push in the history store, and accumulates the asset id. Data-layer
//! failures never escape: when in doubt the asset is included.

use std::collections::HashSet;

use crate::asset_type::AssetType;
use crate::bundle::{Environment, PushMode};
use crate::error::StoreError;
use crate::ports::Collaborators;
use crate::push::NewPushRecord;
use crate::types::{AssetId, BundleId, Timestamp};

/// Outcome of change detection across all environments of the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangeState {
    Unchanged,
    Modified,
    /// History could not be read; include without further bookkeeping.
    HistoryUnavailable,
}

/// Accumulates the assets of one bundle operation that must be sent.
pub struct DependencySet {
    collaborators: Collaborators,
    bundle_id: BundleId,
    asset_type: AssetType,
    mode: PushMode,
    environments: Vec<Environment>,
    assets: HashSet<AssetId>,
}

impl DependencySet {
    /// Build an engine for `bundle_id`.
    ///
    /// Resolves the bundle's environments and its force-push flag. Either
    /// lookup failing is logged and degrades to no environments /
    /// no force-push.
    pub async fn new(
        collaborators: Collaborators,
        bundle_id: impl Into<BundleId>,
        asset_type: AssetType,
        is_download: bool,
        is_publish: bool,
    ) -> Self {
        let bundle_id = bundle_id.into();

        let environments = match collaborators
            .environments
            .environments_for_bundle(&bundle_id)
            .await
        {
            Ok(envs) => envs,
            Err(e) => {
                tracing::error!(error = %e, bundle_id = %bundle_id, "Can't get environments");
                Vec::new()
            }
        };

        let force_push = match collaborators.bundles.bundle_by_id(&bundle_id).await {
            Ok(Some(bundle)) => bundle.force_push,
            Ok(None) => {
                tracing::warn!(bundle_id = %bundle_id, "Bundle not found, assuming no force push");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, bundle_id = %bundle_id, "Can't get bundle");
                false
            }
        };

        let mode = PushMode::resolve(is_publish, is_download, force_push);
        tracing::debug!(
            bundle_id = %bundle_id,
            asset_type = %asset_type,
            mode = %mode,
            environments = environments.len(),
            "Dependency set created"
        );

        Self {
            collaborators,
            bundle_id,
            asset_type,
            mode,
            environments,
            assets: HashSet::new(),
        }
    }

    /// Decide whether `asset_id` goes into the bundle and accumulate it.
    ///
    /// Returns `true` when the asset was included.
    pub async fn evaluate(&mut self, asset_id: &str, mod_date: Option<Timestamp>) -> bool {
        self.evaluate_inner(asset_id, mod_date, false).await
    }

    /// Like [`evaluate`](Self::evaluate), except that in unpublish mode the
    /// asset's cached history is cleared and `true` is returned without
    /// adding the asset to the result set.
    pub async fn evaluate_for_unpublish(
        &mut self,
        asset_id: &str,
        mod_date: Option<Timestamp>,
    ) -> bool {
        self.evaluate_inner(asset_id, mod_date, true).await
    }

    async fn evaluate_inner(
        &mut self,
        asset_id: &str,
        mod_date: Option<Timestamp>,
        clean_only: bool,
    ) -> bool {
        if self.mode == PushMode::Unpublish {
            self.invalidate_cached_pushes(asset_id).await;
            if clean_only {
                return true;
            }
        }

        let included = self.mode.includes_unconditionally()
            || match self.detect_changes(asset_id, mod_date).await {
                ChangeState::Modified | ChangeState::HistoryUnavailable => true,
                ChangeState::Unchanged => false,
            };

        if included {
            self.assets.insert(asset_id.to_string());
        }
        tracing::debug!(
            asset_id,
            bundle_id = %self.bundle_id,
            mode = %self.mode,
            included,
            "Asset evaluated"
        );
        included
    }

    async fn invalidate_cached_pushes(&self, asset_id: &str) {
        for env in &self.environments {
            self.collaborators.cache.invalidate(asset_id, &env.id).await;
        }
    }

    /// Compare the candidate against the push history of every environment,
    /// recording a push wherever it is modified.
    ///
    /// The asset counts as modified if it is modified for any environment.
    async fn detect_changes(&self, asset_id: &str, mod_date: Option<Timestamp>) -> ChangeState {
        let mut any_modified = false;
        // Version metadata does not depend on the environment; read it once.
        let mut version_newer: Option<bool> = None;

        for env in &self.environments {
            let latest = match self
                .collaborators
                .history
                .latest_push_for(asset_id, &env.id)
                .await
            {
                Ok(latest) => latest,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        asset_id,
                        environment_id = %env.id,
                        "Push history unavailable, including asset"
                    );
                    return ChangeState::HistoryUnavailable;
                }
            };

            let mut modified = match (&latest, mod_date) {
                (None, _) => true,
                (Some(record), Some(mod_date)) => record.pushed_at < mod_date,
                (Some(_), None) => false,
            };

            if !modified {
                let newer = match version_newer {
                    Some(newer) => newer,
                    None => {
                        let newer = self.version_is_newer(asset_id, mod_date).await;
                        version_newer = Some(newer);
                        newer
                    }
                };
                modified = newer;
            }

            if modified {
                any_modified = true;
                self.record_push(asset_id, env).await;
            }
        }

        if any_modified {
            ChangeState::Modified
        } else {
            ChangeState::Unchanged
        }
    }

    /// Advisory check against version metadata. Errors are logged and read
    /// as "not newer".
    async fn version_is_newer(&self, asset_id: &str, mod_date: Option<Timestamp>) -> bool {
        match self.check_versions(asset_id, mod_date).await {
            Ok(newer) => newer,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    asset_id,
                    asset_type = %self.asset_type,
                    "Error checking version info, continuing without it"
                );
                false
            }
        }
    }

    async fn check_versions(
        &self,
        asset_id: &str,
        mod_date: Option<Timestamp>,
    ) -> Result<bool, StoreError> {
        let versions = &self.collaborators.versions;
        if self.asset_type.is_localized() {
            for locale in versions.locales().await? {
                if let Some(info) = versions.content_version(asset_id, &locale).await? {
                    if info.is_set() && info.is_newer_than(mod_date) {
                        return Ok(true);
                    }
                }
            }
            Ok(false)
        } else {
            Ok(match versions.asset_version(asset_id).await? {
                Some(info) if info.is_set() => info.is_newer_than(mod_date),
                _ => false,
            })
        }
    }

    /// Insert a push record for this bundle unless one already exists.
    /// Failures are logged; the inclusion decision stands.
    async fn record_push(&self, asset_id: &str, env: &Environment) {
        let history = &self.collaborators.history;

        let already_recorded = match history.all_pushes_for(asset_id).await {
            Ok(pushes) => pushes.iter().any(|p| p.matches(&self.bundle_id, &env.id)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    asset_id,
                    asset_type = %self.asset_type,
                    environment_id = %env.id,
                    "Could not read pushed assets"
                );
                return;
            }
        };
        if already_recorded {
            return;
        }

        let record = NewPushRecord {
            bundle_id: self.bundle_id.clone(),
            asset_id: asset_id.to_string(),
            asset_type: self.asset_type,
            environment_id: env.id.clone(),
            pushed_at: chrono::Utc::now(),
        };
        match history.insert(record).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!(
                asset_id,
                bundle_id = %self.bundle_id,
                environment_id = %env.id,
                "Push recorded concurrently, keeping existing record"
            ),
            Err(e) => tracing::error!(
                error = %e,
                asset_id,
                asset_type = %self.asset_type,
                environment_id = %env.id,
                "Could not save pushed asset"
            ),
        }
    }

    // -----------------------------------------------------------------------
    // Read-only views
    // -----------------------------------------------------------------------

    /// Assets included so far.
    pub fn result_set(&self) -> &HashSet<AssetId> {
        &self.assets
    }

    pub fn into_result_set(self) -> HashSet<AssetId> {
        self.assets
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.assets.contains(asset_id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn mode(&self) -> PushMode {
        self.mode
    }

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
