//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `stockqr_db` (and, for articles,
//! to [`crate::workflow`]) and map errors via [`crate::error::AppError`].

pub mod article;
pub mod reference;
