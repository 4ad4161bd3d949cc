//! Repository for `environments` and `bundle_environments`.

use sqlx::PgPool;

use crate::models::environment::{CreateEnvironment, EnvironmentRow};

const COLUMNS: &str = "id, name, push_to_all, created_at";

/// Provides data access for push environments.
pub struct EnvironmentRepo;

impl EnvironmentRepo {
    /// Register a new environment.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEnvironment,
    ) -> Result<EnvironmentRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO environments (id, name, push_to_all) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EnvironmentRow>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(input.push_to_all)
            .fetch_one(pool)
            .await
    }

    /// Find an environment by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<EnvironmentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM environments WHERE id = $1");
        sqlx::query_as::<_, EnvironmentRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Make `environment_id` a target of `bundle_id`. Idempotent.
    pub async fn attach_to_bundle(
        pool: &PgPool,
        bundle_id: &str,
        environment_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO bundle_environments (bundle_id, environment_id) \
             VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(bundle_id)
        .bind(environment_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Environments targeted by a bundle, ordered by name.
    pub async fn list_by_bundle(
        pool: &PgPool,
        bundle_id: &str,
    ) -> Result<Vec<EnvironmentRow>, sqlx::Error> {
        sqlx::query_as::<_, EnvironmentRow>(
            "SELECT e.id, e.name, e.push_to_all, e.created_at \
             FROM environments e \
             JOIN bundle_environments be ON be.environment_id = e.id \
             WHERE be.bundle_id = $1 \
             ORDER BY e.name, e.id",
        )
        .bind(bundle_id)
        .fetch_all(pool)
        .await
    }
}
