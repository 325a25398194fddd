//! Article save and import workflow.
//!
//! Everything between "form submitted" and "row written" lives here:
//! reference resolution, payload construction, QR rendering, and the
//! inverse path from an interchange PNG back to a stored article.

use serde::Deserialize;
use stockqr_core::error::CoreError;
use stockqr_core::qr_codec;
use stockqr_core::qr_field::FieldSelection;
use stockqr_core::qr_payload::{self, ArticleSnapshot};
use stockqr_core::types::DbId;
use stockqr_db::models::article::{Article, CreateArticle, ImportArticle, UpdateArticle};
use stockqr_db::models::reference::{Reference, ReferenceKind};
use stockqr_db::repositories::{ArticleRepo, ReferenceRepo};
use stockqr_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// A submitted create or edit form.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleForm {
    /// Requested serial number on create. Ignored on update, where the path
    /// id wins. Generated when absent.
    pub serial_number: Option<DbId>,
    pub name: String,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub category: Option<String>,
    pub warehouse_id: Option<DbId>,
    pub manufacturer_id: Option<DbId>,
    pub supplier_id: Option<DbId>,
    /// Field tokens to embed in the QR code. Missing means none.
    #[serde(default)]
    pub include_fields: Vec<String>,
}

impl ArticleForm {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("Article name must not be empty".into()));
        }
        if let Some(id) = self.serial_number {
            if id <= 0 {
                return Err(CoreError::Validation(format!(
                    "Serial number must be positive, got {id}"
                )));
            }
        }
        Ok(())
    }

    /// Parse `include_fields`. Tokens outside the vocabulary are dropped.
    pub fn selection(&self) -> FieldSelection {
        let (selection, ignored) = FieldSelection::from_tokens(&self.include_fields);
        if !ignored.is_empty() {
            tracing::debug!(?ignored, "Ignoring unknown QR field tokens");
        }
        selection
    }
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// The warehouse, manufacturer and supplier rows an article points at.
#[derive(Debug, Default)]
pub struct ResolvedReferences {
    pub warehouse: Option<Reference>,
    pub manufacturer: Option<Reference>,
    pub supplier: Option<Reference>,
}

impl ResolvedReferences {
    /// Look up each given id. A missing row is a 404 naming the entity.
    pub async fn resolve(
        pool: &DbPool,
        warehouse_id: Option<DbId>,
        manufacturer_id: Option<DbId>,
        supplier_id: Option<DbId>,
    ) -> AppResult<Self> {
        Ok(Self {
            warehouse: resolve_one(pool, ReferenceKind::Warehouse, warehouse_id).await?,
            manufacturer: resolve_one(pool, ReferenceKind::Manufacturer, manufacturer_id).await?,
            supplier: resolve_one(pool, ReferenceKind::Supplier, supplier_id).await?,
        })
    }

    pub async fn for_article(pool: &DbPool, article: &Article) -> AppResult<Self> {
        Self::resolve(
            pool,
            article.warehouse_id,
            article.manufacturer_id,
            article.supplier_id,
        )
        .await
    }
}

async fn resolve_one(
    pool: &DbPool,
    kind: ReferenceKind,
    id: Option<DbId>,
) -> AppResult<Option<Reference>> {
    let Some(id) = id else {
        return Ok(None);
    };
    ReferenceRepo::find_by_id(pool, kind, id)
        .await?
        .map(Some)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: kind.entity(),
            id,
        }))
}

// ---------------------------------------------------------------------------
// QR generation
// ---------------------------------------------------------------------------

/// QR columns to store with an article.
#[derive(Debug)]
pub struct GeneratedQr {
    pub qr_code: Option<Vec<u8>>,
    pub qr_fields: Vec<String>,
}

/// Build the payload for a submitted form and render it.
///
/// An encoding failure is logged and leaves the article without an image;
/// the selection is stored either way.
pub fn generate_qr(
    serial_number: DbId,
    form: &ArticleForm,
    refs: &ResolvedReferences,
    selection: &FieldSelection,
    size: u32,
) -> GeneratedQr {
    let snapshot = ArticleSnapshot {
        serial_number,
        name: Some(form.name.clone()),
        length: form.length,
        width: form.width,
        height: form.height,
        category: form.category.clone(),
        warehouse: refs.warehouse.as_ref().map(|r| r.name.clone()),
        manufacturer: refs.manufacturer.as_ref().map(|r| r.name.clone()),
        supplier: refs.supplier.as_ref().map(|r| r.name.clone()),
    };
    let payload = qr_payload::build_payload(&snapshot, selection);

    let qr_code = match qr_codec::encode_png(&payload, size) {
        Ok(png) => Some(png),
        Err(e) => {
            tracing::error!(error = %e, serial_number, "Error generating QR code");
            None
        }
    };

    GeneratedQr {
        qr_code,
        qr_fields: selection.to_tokens(),
    }
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Create an article from a submitted form.
pub async fn create_article(state: &AppState, form: &ArticleForm) -> AppResult<Article> {
    form.validate()?;
    let refs = ResolvedReferences::resolve(
        &state.pool,
        form.warehouse_id,
        form.manufacturer_id,
        form.supplier_id,
    )
    .await?;

    let id = match form.serial_number {
        Some(id) => id,
        None => ArticleRepo::next_id(&state.pool).await?,
    };
    let qr = generate_qr(id, form, &refs, &form.selection(), state.config.qr_code_size);

    let input = CreateArticle {
        id,
        name: form.name.clone(),
        length: form.length,
        width: form.width,
        height: form.height,
        category: form.category.clone(),
        qr_code: qr.qr_code,
        qr_fields: qr.qr_fields,
        warehouse_id: form.warehouse_id,
        manufacturer_id: form.manufacturer_id,
        supplier_id: form.supplier_id,
    };
    Ok(ArticleRepo::create(&state.pool, &input).await?)
}

/// Replace an existing article with a submitted form.
pub async fn update_article(state: &AppState, id: DbId, form: &ArticleForm) -> AppResult<Article> {
    form.validate()?;
    if ArticleRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(article_not_found(id));
    }
    let refs = ResolvedReferences::resolve(
        &state.pool,
        form.warehouse_id,
        form.manufacturer_id,
        form.supplier_id,
    )
    .await?;

    let qr = generate_qr(id, form, &refs, &form.selection(), state.config.qr_code_size);

    let input = UpdateArticle {
        name: form.name.clone(),
        length: form.length,
        width: form.width,
        height: form.height,
        category: form.category.clone(),
        qr_code: qr.qr_code,
        qr_fields: qr.qr_fields,
        warehouse_id: form.warehouse_id,
        manufacturer_id: form.manufacturer_id,
        supplier_id: form.supplier_id,
    };
    ArticleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| article_not_found(id))
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Read a PNG from the interchange directory, decode it and store the
/// recovered article.
///
/// The payload's serial number picks the row to create or merge into; a
/// payload without a usable one gets a fresh id. Warehouse, manufacturer
/// and supplier names in the payload are not resolved back to rows.
pub async fn import_from_interchange(state: &AppState, file_name: &str) -> AppResult<Article> {
    let png = state.qr_dir.read(file_name).await?;
    let text = qr_codec::decode_png(&png)?;
    let decoded = qr_payload::parse_payload(&text)?;
    tracing::debug!(file_name, payload = %text, "Decoded QR code");

    let id = match decoded.serial_number {
        Some(id) if id > 0 => id,
        _ => ArticleRepo::next_id(&state.pool).await?,
    };

    let input = ImportArticle {
        id,
        name: decoded.name,
        length: decoded.length,
        width: decoded.width,
        height: decoded.height,
        category: decoded.category,
        qr_code: png,
        qr_fields: decoded.fields.to_tokens(),
    };
    Ok(ArticleRepo::import(&state.pool, &input).await?)
}

pub fn article_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Article",
        id,
    })
}
