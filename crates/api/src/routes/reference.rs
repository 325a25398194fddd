//! Route definitions shared by `/warehouses`, `/manufacturers` and
//! `/suppliers`.

use axum::routing::get;
use axum::{Extension, Router};
use stockqr_db::models::reference::ReferenceKind;

use crate::handlers::reference;
use crate::state::AppState;

/// Routes for one reference table.
///
/// ```text
/// GET    /                     -> list
/// POST   /                     -> create
/// GET    /{id}                 -> get_by_id
/// ```
pub fn router(kind: ReferenceKind) -> Router<AppState> {
    Router::new()
        .route("/", get(reference::list).post(reference::create))
        .route("/{id}", get(reference::get_by_id))
        .layer(Extension(kind))
}
