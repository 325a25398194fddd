//! Handlers for `/warehouses`, `/manufacturers` and `/suppliers`.
//!
//! The three resources share these handlers; the router attaches the
//! [`ReferenceKind`] each one serves as an extension.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use stockqr_core::error::CoreError;
use stockqr_core::types::DbId;
use stockqr_db::models::reference::{CreateReference, ReferenceKind};
use stockqr_db::repositories::ReferenceRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /{kind}s
pub async fn list(
    Extension(kind): Extension<ReferenceKind>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let rows = ReferenceRepo::list(&state.pool, kind).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /{kind}s
pub async fn create(
    Extension(kind): Extension<ReferenceKind>,
    State(state): State<AppState>,
    Json(input): Json<CreateReference>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{} name must not be empty",
            kind.entity()
        ))));
    }
    let row = ReferenceRepo::create(&state.pool, kind, &input).await?;
    tracing::info!(entity = kind.entity(), id = row.id, "Reference created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// GET /{kind}s/{id}
pub async fn get_by_id(
    Extension(kind): Extension<ReferenceKind>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = ReferenceRepo::find_by_id(&state.pool, kind, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: kind.entity(),
            id,
        }))?;
    Ok(Json(DataResponse { data: row }))
}
