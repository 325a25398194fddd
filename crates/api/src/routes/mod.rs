pub mod article;
pub mod health;
pub mod reference;

use axum::Router;
use stockqr_db::models::reference::ReferenceKind;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /articles                         list, create
/// /articles/new                     new-article form data
/// /articles/upload                  upload form data, import (POST multipart)
/// /articles/edit/{id}               edit form data
/// /articles/delete/{id}             delete
/// /articles/download/{id}           QR PNG attachment
/// /articles/{id}                    view, update (POST)
///
/// /warehouses                       list, create
/// /warehouses/{id}                  get
/// /manufacturers                    list, create
/// /manufacturers/{id}               get
/// /suppliers                        list, create
/// /suppliers/{id}                   get
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .nest("/articles", article::router())
        .nest("/warehouses", reference::router(ReferenceKind::Warehouse))
        .nest("/manufacturers", reference::router(ReferenceKind::Manufacturer))
        .nest("/suppliers", reference::router(ReferenceKind::Supplier))
}
