//! Error types for the OBJ/MTL exporter.

use thiserror::Error;

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Main error type for merge and export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read or encode a baked map image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Mesh handed over by the merge step violates its layout invariants.
    #[error("Malformed mesh: {0}")]
    MalformedMesh(String),

    /// Export configuration is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The mesh produced no material group, so the MTL block has no name.
    #[error("No material group for {0}")]
    MissingMaterialGroup(String),

    /// Failed to export an item.
    #[error("Export error: {0}")]
    Export(String),
}
