//! Repository for the `warehouses`, `manufacturers` and `suppliers` tables.

use sqlx::PgPool;
use stockqr_core::types::DbId;

use crate::models::reference::{CreateReference, Reference, ReferenceKind};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Lookups and inserts for the entities an article references.
///
/// The table name comes from [`ReferenceKind::table`], never from input.
pub struct ReferenceRepo;

impl ReferenceRepo {
    /// Insert a new row, returning it.
    pub async fn create(
        pool: &PgPool,
        kind: ReferenceKind,
        input: &CreateReference,
    ) -> Result<Reference, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} (name) VALUES ($1) RETURNING {COLUMNS}",
            table = kind.table()
        );
        sqlx::query_as::<_, Reference>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        kind: ReferenceKind,
        id: DbId,
    ) -> Result<Option<Reference>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} WHERE id = $1",
            table = kind.table()
        );
        sqlx::query_as::<_, Reference>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all rows ordered by name.
    pub async fn list(pool: &PgPool, kind: ReferenceKind) -> Result<Vec<Reference>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} ORDER BY name, id",
            table = kind.table()
        );
        sqlx::query_as::<_, Reference>(&query).fetch_all(pool).await
    }
}
