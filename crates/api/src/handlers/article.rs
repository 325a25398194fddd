//! Handlers for the `/articles` resource.
//!
//! Form submissions and deletes answer with a `303 See Other` back to the
//! list, reads answer with JSON. The save and import logic itself lives in
//! [`crate::workflow`].

use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use stockqr_core::error::CoreError;
use stockqr_core::interchange::qr_file_name;
use stockqr_core::qr_field::FieldSelection;
use stockqr_core::types::DbId;
use stockqr_db::models::article::Article;
use stockqr_db::models::reference::{Reference, ReferenceKind};
use stockqr_db::repositories::{ArticleRepo, ReferenceRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow::{self, article_not_found, ArticleForm, ResolvedReferences};

/// Where every form submission redirects to.
const ARTICLES_PATH: &str = "/articles";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Detail view of one article.
#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    pub article: Article,
    pub warehouse: Option<Reference>,
    pub manufacturer: Option<Reference>,
    pub supplier: Option<Reference>,
    /// The stored QR PNG, base64-encoded for embedding in a page.
    pub encoded_qr_code: Option<String>,
    /// Fields embedded in the stored QR code.
    pub include_fields: FieldSelection,
}

/// Everything a create or edit form needs to render.
#[derive(Debug, Serialize)]
pub struct ArticleFormData {
    /// `None` for a new article.
    pub article: Option<Article>,
    pub warehouses: Vec<Reference>,
    pub manufacturers: Vec<Reference>,
    pub suppliers: Vec<Reference>,
    pub include_fields: FieldSelection,
}

/// Contents of the upload form: the files that can be imported.
#[derive(Debug, Serialize)]
pub struct UploadFormData {
    pub directory: String,
    pub files: Vec<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_article_exists(state: &AppState, id: DbId) -> AppResult<Article> {
    ArticleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| article_not_found(id))
}

/// Selection stored with an article. Unknown tokens in the column are
/// dropped like any other.
fn stored_selection(article: &Article) -> FieldSelection {
    FieldSelection::from_tokens(&article.qr_fields).0
}

async fn form_data(state: &AppState, article: Option<Article>) -> AppResult<ArticleFormData> {
    let include_fields = article
        .as_ref()
        .map(stored_selection)
        .unwrap_or_default();
    Ok(ArticleFormData {
        article,
        warehouses: ReferenceRepo::list(&state.pool, ReferenceKind::Warehouse).await?,
        manufacturers: ReferenceRepo::list(&state.pool, ReferenceKind::Manufacturer).await?,
        suppliers: ReferenceRepo::list(&state.pool, ReferenceKind::Supplier).await?,
        include_fields,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /articles
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let articles = ArticleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// GET /articles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article_exists(&state, id).await?;
    let refs = ResolvedReferences::for_article(&state.pool, &article).await?;

    let detail = ArticleDetail {
        encoded_qr_code: article.qr_code.as_ref().map(|png| BASE64.encode(png)),
        include_fields: stored_selection(&article),
        warehouse: refs.warehouse,
        manufacturer: refs.manufacturer,
        supplier: refs.supplier,
        article,
    };
    Ok(Json(DataResponse { data: detail }))
}

/// GET /articles/new
pub async fn new_form(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = form_data(&state, None).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /articles
///
/// Create an article, generate its QR code and redirect to the list.
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<ArticleForm>,
) -> AppResult<Redirect> {
    let article = workflow::create_article(&state, &form).await?;
    tracing::info!(
        article_id = article.id,
        qr_fields = ?article.qr_fields,
        has_qr_code = article.qr_code.is_some(),
        "Article created"
    );
    Ok(Redirect::to(ARTICLES_PATH))
}

/// GET /articles/edit/{id}
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article_exists(&state, id).await?;
    let data = form_data(&state, Some(article)).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /articles/{id}
///
/// Replace an article, regenerate its QR code and redirect to the list.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(form): Json<ArticleForm>,
) -> AppResult<Redirect> {
    let article = workflow::update_article(&state, id, &form).await?;
    tracing::info!(
        article_id = article.id,
        qr_fields = ?article.qr_fields,
        has_qr_code = article.qr_code.is_some(),
        "Article updated"
    );
    Ok(Redirect::to(ARTICLES_PATH))
}

/// GET /articles/delete/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Redirect> {
    if !ArticleRepo::delete(&state.pool, id).await? {
        return Err(article_not_found(id));
    }
    tracing::info!(article_id = id, "Article deleted");
    Ok(Redirect::to(ARTICLES_PATH))
}

/// GET /articles/download/{id}
///
/// Mirror the QR image into the interchange directory and return it as a
/// PNG attachment. 404 without touching the directory when there is no
/// image.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let article = ensure_article_exists(&state, id).await?;
    let png = article.qr_code.ok_or(AppError::Core(CoreError::NotFound {
        entity: "QR code for article",
        id,
    }))?;

    let path = state.qr_dir.write_qr(id, &png).await?;
    tracing::info!(article_id = id, path = %path.display(), "QR code written to interchange directory");

    let headers = [
        (CONTENT_TYPE, "image/png".to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename={}", qr_file_name(id)),
        ),
        (CONTENT_LENGTH, png.len().to_string()),
    ];
    Ok((StatusCode::OK, headers, png).into_response())
}

/// GET /articles/upload
pub async fn upload_form(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let data = UploadFormData {
        directory: state.qr_dir.root().display().to_string(),
        files: state.qr_dir.list_png().await?,
    };
    Ok(Json(DataResponse { data }))
}

/// POST /articles/upload
///
/// Multipart form with a `file` field. Only the file's *name* is used: the
/// image itself is read from the interchange directory, decoded, and stored
/// as an article. An empty file is a no-op.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Redirect> {
    let mut upload: Option<(String, usize)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue; // ignore unknown fields
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((file_name, data.len()));
    }

    let (file_name, size) =
        upload.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if size == 0 {
        tracing::debug!(file_name = %file_name, "Empty upload, nothing to import");
        return Ok(Redirect::to(ARTICLES_PATH));
    }

    let article = workflow::import_from_interchange(&state, &file_name).await?;
    tracing::info!(
        article_id = article.id,
        file_name = %file_name,
        qr_fields = ?article.qr_fields,
        "Article imported from QR code"
    );
    Ok(Redirect::to(ARTICLES_PATH))
}
