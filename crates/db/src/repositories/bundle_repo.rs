//! Repository for the `bundles` table.

use sqlx::PgPool;

use crate::models::bundle::{BundleRow, CreateBundle};

const COLUMNS: &str = "id, name, force_push, publish_date, expire_date, owner, created_at";

/// Provides data access for bundles.
pub struct BundleRepo;

impl BundleRepo {
    /// Insert a new bundle.
    pub async fn create(pool: &PgPool, input: &CreateBundle) -> Result<BundleRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO bundles (id, name, force_push, publish_date, expire_date, owner) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BundleRow>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(input.force_push)
            .bind(input.publish_date)
            .bind(input.expire_date)
            .bind(&input.owner)
            .fetch_one(pool)
            .await
    }

    /// Find a bundle by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<BundleRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bundles WHERE id = $1");
        sqlx::query_as::<_, BundleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Toggle the force-push flag.
    pub async fn set_force_push(
        pool: &PgPool,
        id: &str,
        force_push: bool,
    ) -> Result<Option<BundleRow>, sqlx::Error> {
        let query = format!(
            "UPDATE bundles SET force_push = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BundleRow>(&query)
            .bind(id)
            .bind(force_push)
            .fetch_optional(pool)
            .await
    }
}
