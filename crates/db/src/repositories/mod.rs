//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod article_repo;
pub mod reference_repo;

pub use article_repo::ArticleRepo;
pub use reference_repo::ReferenceRepo;
