//! Typed error hierarchy for dtkit.
//!
//! Two enums cover the two places a fault may legitimately surface:
//! - `CatalogError`: building or loading a phase catalog
//! - `ExportError`: laying out, rendering or writing an exported document
//!
//! Sanitization, validation and phase transitions never fail; they report
//! problems as data.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from building or loading a phase catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Phase catalog must contain at least one phase")]
    Empty,

    #[error("Duplicate phase id '{id}' in catalog")]
    DuplicateId { id: String },

    #[error("Failed to read catalog file at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog file at {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write catalog file at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the export engine and its renderers.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid page layout: {0}")]
    InvalidLayout(String),

    #[error("Character {ch:?} on page {page} cannot be rendered")]
    Unrenderable { page: u32, ch: char },

    #[error("Failed to write export to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
