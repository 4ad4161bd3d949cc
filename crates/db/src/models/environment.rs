//! Environment rows.

use pushtrack_core::types::Timestamp;
use pushtrack_core::Environment;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `environments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EnvironmentRow {
    pub id: String,
    pub name: String,
    pub push_to_all: bool,
    pub created_at: Timestamp,
}

/// DTO for registering an environment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnvironment {
    pub id: String,
    pub name: String,
    pub push_to_all: bool,
}

impl From<EnvironmentRow> for Environment {
    fn from(row: EnvironmentRow) -> Self {
        Environment {
            id: row.id,
            name: row.name,
            push_to_all: row.push_to_all,
        }
    }
}
