//! Version metadata as seen by the change detector.

use serde::{Deserialize, Serialize};

use crate::types::{LocaleId, Timestamp};

/// Latest version marker of an asset (or of one locale of a content asset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub identifier: String,
    pub version_ts: Option<Timestamp>,
}

impl VersionInfo {
    /// Rows with a blank identifier are placeholders and carry no signal.
    pub fn is_set(&self) -> bool {
        !self.identifier.trim().is_empty()
    }

    /// Whether this version is newer than what the caller reported.
    ///
    /// A set row without a timestamp always counts as newer. Without a
    /// caller date only that case can be detected.
    pub fn is_newer_than(&self, mod_date: Option<Timestamp>) -> bool {
        match (self.version_ts, mod_date) {
            (None, _) => true,
            (Some(ts), Some(mod_date)) => mod_date < ts,
            (Some(_), None) => false,
        }
    }
}

/// A configured content language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub id: LocaleId,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn info(ts: Option<Timestamp>) -> VersionInfo {
        VersionInfo {
            identifier: "abc-123".to_string(),
            version_ts: ts,
        }
    }

    #[test]
    fn missing_timestamp_is_newer() {
        assert!(info(None).is_newer_than(Some(Utc::now())));
        assert!(info(None).is_newer_than(None));
    }

    #[test]
    fn compares_against_mod_date() {
        let now = Utc::now();
        assert!(info(Some(now)).is_newer_than(Some(now - Duration::seconds(5))));
        assert!(!info(Some(now)).is_newer_than(Some(now)));
        assert!(!info(Some(now)).is_newer_than(Some(now + Duration::seconds(5))));
    }

    #[test]
    fn without_mod_date_a_timestamp_is_not_newer() {
        assert!(!info(Some(Utc::now())).is_newer_than(None));
    }

    #[test]
    fn blank_identifier_is_unset() {
        let row = VersionInfo {
            identifier: "  ".to_string(),
            version_ts: None,
        };
        assert!(!row.is_set());
    }
}
