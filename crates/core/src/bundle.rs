//! Bundle and environment descriptors, and the operating mode derived from them.

use serde::{Deserialize, Serialize};

use crate::types::{BundleId, EnvironmentId, Timestamp};

/// A remote distribution target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub id: EnvironmentId,
    pub name: String,
    /// Push to every endpoint of the environment rather than the first
    /// reachable one. Informational for this crate.
    pub push_to_all: bool,
}

impl Environment {
    pub fn new(id: impl Into<EnvironmentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            push_to_all: false,
        }
    }
}

/// Bundle-level settings read once when an engine is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: BundleId,
    pub name: String,
    /// Disables change detection: every candidate is included.
    pub force_push: bool,
    pub publish_date: Option<Timestamp>,
    pub expire_date: Option<Timestamp>,
    pub owner: Option<String>,
}

impl Bundle {
    pub fn new(id: impl Into<BundleId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            force_push: false,
            publish_date: None,
            expire_date: None,
            owner: None,
        }
    }

    pub fn with_force_push(mut self, force_push: bool) -> Self {
        self.force_push = force_push;
        self
    }
}

/// How an engine treats its candidates, resolved once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushMode {
    /// Stop tracking assets: clear cached history, include everything.
    Unpublish,
    /// Local download bundle: include everything, no history bookkeeping.
    Download,
    /// Bundle flagged force-push: include everything, no change detection.
    Forced,
    /// Push to remote environments only what changed since the last push.
    Conditional,
}

impl PushMode {
    /// Fold the construction flags into a single mode.
    ///
    /// Unpublish wins over download, download over force-push.
    pub fn resolve(is_publish: bool, is_download: bool, force_push: bool) -> Self {
        match (is_publish, is_download, force_push) {
            (false, _, _) => Self::Unpublish,
            (true, true, _) => Self::Download,
            (true, false, true) => Self::Forced,
            (true, false, false) => Self::Conditional,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpublish => "unpublish",
            Self::Download => "download",
            Self::Forced => "forced",
            Self::Conditional => "conditional",
        }
    }

    /// Every mode except `Conditional` includes candidates unconditionally.
    pub fn includes_unconditionally(&self) -> bool {
        !matches!(self, Self::Conditional)
    }
}

impl std::fmt::Display for PushMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpublish_takes_precedence() {
        assert_eq!(PushMode::resolve(false, true, true), PushMode::Unpublish);
        assert_eq!(PushMode::resolve(false, false, false), PushMode::Unpublish);
    }

    #[test]
    fn download_takes_precedence_over_force_push() {
        assert_eq!(PushMode::resolve(true, true, true), PushMode::Download);
        assert_eq!(PushMode::resolve(true, true, false), PushMode::Download);
    }

    #[test]
    fn force_push_and_conditional() {
        assert_eq!(PushMode::resolve(true, false, true), PushMode::Forced);
        assert_eq!(PushMode::resolve(true, false, false), PushMode::Conditional);
    }

    #[test]
    fn only_conditional_does_change_detection() {
        assert!(!PushMode::Conditional.includes_unconditionally());
        assert!(PushMode::Forced.includes_unconditionally());
        assert!(PushMode::Download.includes_unconditionally());
        assert!(PushMode::Unpublish.includes_unconditionally());
    }
}
