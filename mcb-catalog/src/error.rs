//! Error types for mcb-catalog

use crate::marc::MarcError;
use crate::sources::SourceError;
use thiserror::Error;

/// Errors raised while running a batch
#[derive(Debug, Error)]
pub enum CatalogError {
    /// MARC encoding or decoding error
    #[error("MARC error: {0}")]
    Marc(#[from] MarcError),

    /// Catalog or provider request failed
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// mcb-common error (configuration, input)
    #[error("Common error: {0}")]
    Common(#[from] mcb_common::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed batch file (missing column, bad row)
    #[error("Batch file error: {0}")]
    Batch(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
