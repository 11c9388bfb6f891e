//! Error types used by the crate.

use geocredit_manifest::error::ManifestError;
use thiserror::Error;

/// Geocredit error type.
#[derive(Debug, Error)]
pub enum GeocreditError {
    /// I/O error (network or file)
    #[error("failed to load data")]
    IO,
    /// Item not found.
    #[error("item not found")]
    NotFound,
    /// Plugin manifest could not be read.
    #[error("invalid plugin manifest: {0}")]
    Manifest(#[from] ManifestError),
    /// Error creating a bundle archive.
    #[error("archive error: {0}")]
    Archive(String),
    /// Invalid CSS selector used to inspect credit markup.
    #[error("invalid selector: {0}")]
    Selector(String),
    /// Invalid configuration of a component.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
    /// Error reading/writing data to the FS.
    #[error("failed to read file")]
    FsIo(#[from] std::io::Error),
}

impl From<reqwest::Error> for GeocreditError {
    fn from(_value: reqwest::Error) -> Self {
        Self::IO
    }
}

impl From<zip::result::ZipError> for GeocreditError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Archive(value.to_string())
    }
}
