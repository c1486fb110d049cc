//! Extraction error types

use thiserror::Error;

/// Errors from the AI extraction stage.
///
/// All of these are terminal for the request; nothing is retried.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The endpoint could not be reached (connect error, timeout, body read)
    #[error("AI request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status
    #[error("AI service returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// A 2xx response carried no completion text
    #[error("AI response contained no completion text")]
    EmptyCompletion,

    /// The completion text is not valid JSON
    #[error("AI response is not valid JSON: {excerpt}")]
    MalformedResponse { excerpt: String },

    /// A field is missing or has the wrong primitive type
    #[error("AI response field '{field}' is missing or has the wrong type")]
    SchemaValidation { field: String },
}
