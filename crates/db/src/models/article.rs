//! Article entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use stockqr_core::types::{DbId, Timestamp};

/// A row from the `articles` table.
///
/// `id` is the article's serial number. The PNG in `qr_code` is left out of
/// JSON; handlers expose it base64-encoded or as a download.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub name: String,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub category: Option<String>,
    #[serde(skip_serializing)]
    pub qr_code: Option<Vec<u8>>,
    pub qr_fields: Vec<String>,
    pub warehouse_id: Option<DbId>,
    pub manufacturer_id: Option<DbId>,
    pub supplier_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO. The id is always known up front because it is printed
/// inside the QR code stored alongside the row.
#[derive(Debug, Clone)]
pub struct CreateArticle {
    pub id: DbId,
    pub name: String,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub category: Option<String>,
    pub qr_code: Option<Vec<u8>>,
    pub qr_fields: Vec<String>,
    pub warehouse_id: Option<DbId>,
    pub manufacturer_id: Option<DbId>,
    pub supplier_id: Option<DbId>,
}

/// Full-replacement update DTO, mirroring a submitted edit form.
#[derive(Debug, Clone)]
pub struct UpdateArticle {
    pub name: String,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub category: Option<String>,
    pub qr_code: Option<Vec<u8>>,
    pub qr_fields: Vec<String>,
    pub warehouse_id: Option<DbId>,
    pub manufacturer_id: Option<DbId>,
    pub supplier_id: Option<DbId>,
}

/// An article recovered from a scanned QR image.
///
/// `None` fields were not embedded in the code and leave an existing row's
/// value untouched. References are never part of an import.
#[derive(Debug, Clone)]
pub struct ImportArticle {
    pub id: DbId,
    pub name: Option<String>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub category: Option<String>,
    pub qr_code: Vec<u8>,
    pub qr_fields: Vec<String>,
}
