//! Warehouse, manufacturer and supplier rows.
//!
//! The three tables share one shape, so they share one model and one
//! repository; [`ReferenceKind`] selects the table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockqr_core::types::{DbId, Timestamp};

/// Which reference table a row lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Warehouse,
    Manufacturer,
    Supplier,
}

impl ReferenceKind {
    pub fn table(self) -> &'static str {
        match self {
            ReferenceKind::Warehouse => "warehouses",
            ReferenceKind::Manufacturer => "manufacturers",
            ReferenceKind::Supplier => "suppliers",
        }
    }

    /// Entity name used in not-found errors.
    pub fn entity(self) -> &'static str {
        match self {
            ReferenceKind::Warehouse => "Warehouse",
            ReferenceKind::Manufacturer => "Manufacturer",
            ReferenceKind::Supplier => "Supplier",
        }
    }
}

/// A row from `warehouses`, `manufacturers` or `suppliers`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reference {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a reference row.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReference {
    pub name: String,
}
