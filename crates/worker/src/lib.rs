//! Push evaluation worker.
//!
//! Reads asset candidates as JSON lines, runs them through one
//! [`DependencySet`] and reports the assets that must be sent.

pub mod config;

use pushtrack_core::{AssetCandidate, DependencySet, PushMode};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Summary printed once every candidate has been evaluated.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub bundle_id: String,
    pub mode: PushMode,
    pub evaluated: usize,
    pub skipped: usize,
    /// Included asset ids, sorted.
    pub included: Vec<String>,
}

/// Feed every candidate line of `input` through `set`.
///
/// Blank lines are ignored. Lines that do not parse, or whose asset type
/// differs from the set's, are logged and skipped.
pub async fn evaluate_candidates<R>(
    set: &mut DependencySet,
    input: R,
) -> std::io::Result<EvaluationReport>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut evaluated = 0;
    let mut skipped = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let candidate: AssetCandidate = match serde_json::from_str(line) {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::warn!(error = %e, line, "Skipping malformed candidate");
                skipped += 1;
                continue;
            }
        };
        if candidate.asset_type != set.asset_type() {
            tracing::warn!(
                asset_id = %candidate.asset_id,
                asset_type = %candidate.asset_type,
                expected = %set.asset_type(),
                "Skipping candidate of another asset type"
            );
            skipped += 1;
            continue;
        }

        if set.mode() == PushMode::Unpublish {
            set.evaluate_for_unpublish(&candidate.asset_id, candidate.mod_date)
                .await;
        } else {
            set.evaluate(&candidate.asset_id, candidate.mod_date).await;
        }
        evaluated += 1;
    }

    let mut included: Vec<String> = set.result_set().iter().cloned().collect();
    included.sort();

    Ok(EvaluationReport {
        bundle_id: set.bundle_id().to_string(),
        mode: set.mode(),
        evaluated,
        skipped,
        included,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pushtrack_core::memory::{InMemoryDirectory, InMemoryPushHistory, InMemoryVersions};
    use pushtrack_core::{AssetType, Bundle, Collaborators, Environment, PushedAssetsCache};

    use super::*;

    async fn set_for(force_push: bool, is_publish: bool) -> (DependencySet, Arc<InMemoryPushHistory>) {
        let directory = Arc::new(InMemoryDirectory::new());
        directory
            .add_bundle(Bundle::new("b1", "Release").with_force_push(force_push))
            .await;
        directory.attach("b1", Environment::new("e1", "Production")).await;
        let history = Arc::new(InMemoryPushHistory::new());
        let collaborators = Collaborators {
            environments: directory.clone(),
            bundles: directory,
            versions: Arc::new(InMemoryVersions::new()),
            history: history.clone(),
            cache: Arc::new(PushedAssetsCache::new()),
        };
        let set = DependencySet::new(collaborators, "b1", AssetType::Content, false, is_publish).await;
        (set, history)
    }

    #[tokio::test]
    async fn evaluates_json_lines_and_skips_bad_input() {
        let (mut set, history) = set_for(false, true).await;
        let input = concat!(
            "{\"asset_id\":\"c2\",\"asset_type\":\"content\",\"mod_date\":\"2026-01-01T00:00:00Z\"}\n",
            "\n",
            "not json\n",
            "{\"asset_id\":\"t1\",\"asset_type\":\"template\"}\n",
            "{\"asset_id\":\"c1\",\"asset_type\":\"content\"}\n",
        );

        let report = evaluate_candidates(&mut set, input.as_bytes()).await.unwrap();

        assert_eq!(report.mode, PushMode::Conditional);
        assert_eq!(report.evaluated, 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.included, vec!["c1", "c2"]);
        assert_eq!(history.records().await.len(), 2);
    }

    #[tokio::test]
    async fn unpublish_reports_nothing_included() {
        let (mut set, history) = set_for(false, false).await;
        let input = "{\"asset_id\":\"c1\",\"asset_type\":\"content\"}\n";

        let report = evaluate_candidates(&mut set, input.as_bytes()).await.unwrap();

        assert_eq!(report.mode, PushMode::Unpublish);
        assert_eq!(report.evaluated, 1);
        assert!(report.included.is_empty());
        assert!(history.records().await.is_empty());
    }

    #[test]
    fn report_serializes_mode_in_snake_case() {
        let report = EvaluationReport {
            bundle_id: "b1".to_string(),
            mode: PushMode::Forced,
            evaluated: 1,
            skipped: 0,
            included: vec!["a1".to_string()],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "forced");
        assert_eq!(json["included"][0], "a1");
    }
}
