//! OCR Types

use thiserror::Error;

/// Separator inserted between pages in the combined text.
pub const PAGE_BREAK: &str = "\n\n--- PAGE BREAK ---\n\n";

/// Recognized text for a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// Zero-based page index.
    pub page: usize,
    /// Normalized text in the engine's reading order.
    pub text: String,
}

/// Ordered recognized text for a whole document.
///
/// Immutable once produced; the orchestrator consumes it exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedText {
    pages: Vec<PageText>,
}

impl RecognizedText {
    pub fn new(pages: Vec<PageText>) -> Self {
        Self { pages }
    }

    /// Per-page fragments in page order.
    pub fn pages(&self) -> &[PageText] {
        &self.pages
    }

    /// All pages joined with the page-break separator.
    pub fn combined(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(PAGE_BREAK)
    }

    /// Total non-whitespace-trimmed text length across pages.
    pub fn text_len(&self) -> usize {
        self.pages.iter().map(|p| p.text.trim().len()).sum()
    }
}

/// OCR error types
#[derive(Debug, Error)]
pub enum OcrError {
    /// No configured engine answered its availability probe
    #[error("No OCR engine available")]
    NoEngineAvailable,

    /// An engine failed on a specific page
    #[error("OCR failed on page {page}: {message}")]
    Page { page: usize, message: String },

    /// Engine-side processing failure
    #[error("OCR processing failed: {0}")]
    Processing(String),

    /// HTTP-level failure talking to a remote engine
    #[error("OCR API error: {0}")]
    Api(String),

    /// The document produced no usable text
    #[error("OCR failed to extract meaningful text from the document")]
    NoText,
}
