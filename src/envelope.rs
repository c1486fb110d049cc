//! Uniform response envelope
//!
//! Every extraction request, successful or not, is answered with the same
//! wrapper so clients never have to branch on response shape.

use serde::Serialize;

use crate::invoice::InvoiceRecord;

/// Maximum number of characters of recognized text echoed back to clients.
const OCR_ECHO_LIMIT: usize = 500;

/// Standardized API response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    /// Whether extraction succeeded at the business level.
    pub success: bool,
    /// The extracted invoice, present on success only.
    pub data: Option<InvoiceRecord>,
    /// Human-readable error message, present on failure only.
    pub error: Option<String>,
    /// Truncated recognized text, echoed on success for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
}

impl ApiResponse {
    /// Build a success envelope with the OCR echo truncated for transport.
    pub fn success(record: InvoiceRecord, ocr_text: &str) -> Self {
        Self {
            success: true,
            data: Some(record),
            error: None,
            ocr_text: Some(truncate_echo(ocr_text)),
        }
    }

    /// Build a failure envelope carrying only the human-readable message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            ocr_text: None,
        }
    }
}

fn truncate_echo(text: &str) -> String {
    if text.chars().count() <= OCR_ECHO_LIMIT {
        return text.to_string();
    }
    let truncated: String = text.chars().take(OCR_ECHO_LIMIT).collect();
    format!("{}...", truncated)
}
