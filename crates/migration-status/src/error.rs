use thiserror::Error;

use crate::catalog::CatalogKey;

/// Errors from the migration status resolver.
///
/// Malformed numeric facts are never errors; they are coerced to zero.
/// Everything here is a setup or integration fault on the caller's side.
#[derive(Error, Debug)]
pub enum MigrationStatusError {
    // --- Content catalog errors ---
    #[error("content catalog is missing required entry: {0}")]
    MissingCatalogEntry(CatalogKey),

    #[error("content catalog could not be parsed as {format}: {message}")]
    CatalogParse {
        format: &'static str,
        message: String,
    },

    // --- Configuration errors ---
    #[error("resolver config could not be parsed: {0}")]
    ConfigParse(String),

    #[error("invalid resolver config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MigrationStatusResult<T> = Result<T, MigrationStatusError>;
