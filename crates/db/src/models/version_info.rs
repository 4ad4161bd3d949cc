//! Version metadata and language rows.

use pushtrack_core::types::{LocaleId, Timestamp};
use pushtrack_core::{Locale, VersionInfo};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `version_info` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VersionInfoRow {
    pub identifier: String,
    pub version_ts: Option<Timestamp>,
}

/// A row from the `content_version_info` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentVersionInfoRow {
    pub identifier: String,
    pub language_id: LocaleId,
    pub version_ts: Option<Timestamp>,
}

/// A row from the `languages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LanguageRow {
    pub id: LocaleId,
    pub code: String,
}

impl From<VersionInfoRow> for VersionInfo {
    fn from(row: VersionInfoRow) -> Self {
        VersionInfo {
            identifier: row.identifier,
            version_ts: row.version_ts,
        }
    }
}

impl From<ContentVersionInfoRow> for VersionInfo {
    fn from(row: ContentVersionInfoRow) -> Self {
        VersionInfo {
            identifier: row.identifier,
            version_ts: row.version_ts,
        }
    }
}

impl From<LanguageRow> for Locale {
    fn from(row: LanguageRow) -> Self {
        Locale {
            id: row.id,
            code: row.code,
        }
    }
}
