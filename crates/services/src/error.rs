//! Shared error types for the services crate.

use thiserror::Error;

use course_core::model::CatalogError;
use storage::sqlite::SqliteInitError;

pub use course_core::exam_session::ExamError;

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
