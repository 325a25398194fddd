//! Route definitions for the `/articles` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::article;
use crate::state::AppState;

/// Routes mounted at `/articles`.
///
/// ```text
/// GET    /                     -> list
/// POST   /                     -> create
/// GET    /new                  -> new_form
/// GET    /upload               -> upload_form
/// POST   /upload               -> upload
/// GET    /edit/{id}            -> edit_form
/// GET    /delete/{id}          -> delete
/// GET    /download/{id}        -> download
/// GET    /{id}                 -> get_by_id
/// POST   /{id}                 -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(article::list).post(article::create))
        .route("/new", get(article::new_form))
        .route("/upload", get(article::upload_form).post(article::upload))
        .route("/edit/{id}", get(article::edit_form))
        .route("/delete/{id}", get(article::delete))
        .route("/download/{id}", get(article::download))
        .route("/{id}", get(article::get_by_id).post(article::update))
}
