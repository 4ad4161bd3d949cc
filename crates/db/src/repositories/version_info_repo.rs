//! Repository for `languages`, `version_info` and `content_version_info`.

use pushtrack_core::types::{LocaleId, Timestamp};
use sqlx::PgPool;

use crate::models::version_info::{ContentVersionInfoRow, LanguageRow, VersionInfoRow};

/// Provides data access for version metadata.
pub struct VersionInfoRepo;

impl VersionInfoRepo {
    /// Add a content language.
    pub async fn create_language(
        pool: &PgPool,
        id: LocaleId,
        code: &str,
    ) -> Result<LanguageRow, sqlx::Error> {
        sqlx::query_as::<_, LanguageRow>(
            "INSERT INTO languages (id, code) VALUES ($1, $2) RETURNING id, code",
        )
        .bind(id)
        .bind(code)
        .fetch_one(pool)
        .await
    }

    /// All content languages ordered by id.
    pub async fn list_languages(pool: &PgPool) -> Result<Vec<LanguageRow>, sqlx::Error> {
        sqlx::query_as::<_, LanguageRow>("SELECT id, code FROM languages ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Insert or replace the version timestamp of a non-localized asset.
    pub async fn upsert_asset_version(
        pool: &PgPool,
        identifier: &str,
        version_ts: Option<Timestamp>,
    ) -> Result<VersionInfoRow, sqlx::Error> {
        sqlx::query_as::<_, VersionInfoRow>(
            "INSERT INTO version_info (identifier, version_ts) VALUES ($1, $2) \
             ON CONFLICT (identifier) DO UPDATE SET version_ts = EXCLUDED.version_ts \
             RETURNING identifier, version_ts",
        )
        .bind(identifier)
        .bind(version_ts)
        .fetch_one(pool)
        .await
    }

    pub async fn find_asset_version(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<VersionInfoRow>, sqlx::Error> {
        sqlx::query_as::<_, VersionInfoRow>(
            "SELECT identifier, version_ts FROM version_info WHERE identifier = $1",
        )
        .bind(identifier)
        .fetch_optional(pool)
        .await
    }

    /// Insert or replace the version timestamp of one locale of a content asset.
    pub async fn upsert_content_version(
        pool: &PgPool,
        identifier: &str,
        language_id: LocaleId,
        version_ts: Option<Timestamp>,
    ) -> Result<ContentVersionInfoRow, sqlx::Error> {
        sqlx::query_as::<_, ContentVersionInfoRow>(
            "INSERT INTO content_version_info (identifier, language_id, version_ts) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (identifier, language_id) DO UPDATE SET version_ts = EXCLUDED.version_ts \
             RETURNING identifier, language_id, version_ts",
        )
        .bind(identifier)
        .bind(language_id)
        .bind(version_ts)
        .fetch_one(pool)
        .await
    }

    pub async fn find_content_version(
        pool: &PgPool,
        identifier: &str,
        language_id: LocaleId,
    ) -> Result<Option<ContentVersionInfoRow>, sqlx::Error> {
        sqlx::query_as::<_, ContentVersionInfoRow>(
            "SELECT identifier, language_id, version_ts FROM content_version_info \
             WHERE identifier = $1 AND language_id = $2",
        )
        .bind(identifier)
        .bind(language_id)
        .fetch_optional(pool)
        .await
    }
}
