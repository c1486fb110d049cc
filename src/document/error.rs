//! Document error types

use thiserror::Error;

/// Errors from document loading and rasterization.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Uploaded buffer was empty
    #[error("Document is empty")]
    EmptyDocument,

    /// PDF rasterization failed
    #[error("Failed to render PDF: {0}")]
    PdfRender(String),

    /// Rasterization exceeded the configured deadline
    #[error("PDF rendering timed out after {0} seconds")]
    RenderTimeout(u64),
}

impl From<mupdf::Error> for DocumentError {
    fn from(err: mupdf::Error) -> Self {
        DocumentError::PdfRender(err.to_string())
    }
}
