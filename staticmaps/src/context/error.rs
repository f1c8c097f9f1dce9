//! Render error types.

use thiserror::Error;

use crate::provider::ProviderError;

/// Errors that fail a whole render call.
///
/// Per-tile problems never show up here; they are logged and the affected
/// tiles are left blank.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Nothing to derive the viewport from.
    #[error("cannot determine map center: no bounding box, no center and no objects")]
    NoCenter,

    /// Requested output or canvas has a zero dimension.
    #[error("invalid image size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// The drawing surface could not be created or converted.
    #[error("canvas error: {0}")]
    Canvas(String),

    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[source] ProviderError),
}
