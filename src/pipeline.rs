//! Extraction pipeline
//!
//! The linear composition the whole server exists for:
//! resolve media type -> load pages -> recognize text -> extract record.
//! Stages run strictly in order; any failure is terminal for the request
//! and no state survives between requests.

use axum::http::StatusCode;
use thiserror::Error;

use crate::document::{DocumentError, DocumentLoader, MediaType};
use crate::extract::{ExtractError, ExtractionService};
use crate::invoice::InvoiceRecord;
use crate::ocr::{OcrError, OcrService};

/// What the upload declared about itself.
#[derive(Debug, Clone, Default)]
pub struct DeclaredType {
    /// Content type of the multipart field, if any
    pub content_type: Option<String>,
    /// Original file name, if any
    pub file_name: Option<String>,
}

/// A completed extraction: the record plus the recognized text that
/// produced it (echoed back, truncated, for diagnostics).
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: InvoiceRecord,
    pub ocr_text: String,
}

/// Pipeline error taxonomy.
///
/// `status_code` separates transport-level rejections (4xx before any
/// pipeline work) from business-level failures, which answer 200 with a
/// failure envelope.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported media type: {declared}. Allowed types: application/pdf, image/jpeg, image/png")]
    UnsupportedMediaType { declared: String },

    #[error("File too large: {size} bytes (maximum {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl PipelineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Document(DocumentError::EmptyDocument) => StatusCode::BAD_REQUEST,
            // Business-level failures still answer 200; the envelope
            // carries the outcome.
            _ => StatusCode::OK,
        }
    }
}

/// The request-orchestration pipeline.
pub struct InvoicePipeline {
    loader: DocumentLoader,
    ocr: OcrService,
    extractor: ExtractionService,
    max_upload_bytes: usize,
}

impl InvoicePipeline {
    pub fn new(
        loader: DocumentLoader,
        ocr: OcrService,
        extractor: ExtractionService,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            loader,
            ocr,
            extractor,
            max_upload_bytes,
        }
    }

    /// Run one upload through the full pipeline.
    pub async fn process(
        &self,
        data: &[u8],
        declared: &DeclaredType,
    ) -> Result<Extraction, PipelineError> {
        if data.len() > self.max_upload_bytes {
            return Err(PipelineError::PayloadTooLarge {
                size: data.len(),
                max: self.max_upload_bytes,
            });
        }

        let media_type = resolve_media_type(data, declared)?;
        tracing::info!(
            media = %media_type,
            size = data.len(),
            file_name = declared.file_name.as_deref().unwrap_or("-"),
            "Processing invoice upload"
        );

        let pages = self.loader.load(data, media_type).await?;
        tracing::debug!(pages = pages.len(), "Document loaded");

        let text = self.ocr.recognize(&pages).await?;
        let ocr_text = text.combined();
        tracing::debug!(chars = ocr_text.len(), "OCR complete");

        let record = self.extractor.extract(&text).await?;
        tracing::info!(
            invoice_number = record.invoice_number.as_deref().unwrap_or("-"),
            currency = %record.currency,
            "Invoice extracted"
        );

        Ok(Extraction { record, ocr_text })
    }
}

/// Resolve the upload's media type.
///
/// A declared content type is authoritative (except the generic
/// octet-stream); otherwise the file extension, and as a last resort the
/// magic bytes.
fn resolve_media_type(
    data: &[u8],
    declared: &DeclaredType,
) -> Result<MediaType, PipelineError> {
    if let Some(content_type) = declared
        .content_type
        .as_deref()
        .filter(|ct| !ct.starts_with("application/octet-stream"))
    {
        return MediaType::from_mime(content_type).ok_or_else(|| {
            PipelineError::UnsupportedMediaType {
                declared: content_type.to_string(),
            }
        });
    }

    if let Some(name) = declared.file_name.as_deref() {
        if let Some(media) = MediaType::from_file_name(name) {
            return Ok(media);
        }
    }

    MediaType::from_magic_bytes(data).ok_or_else(|| PipelineError::UnsupportedMediaType {
        declared: declared
            .content_type
            .clone()
            .or_else(|| declared.file_name.clone())
            .unwrap_or_else(|| "unknown".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::config::RenderConfig;
    use crate::extract::CompletionClient;
    use crate::ocr::{OcrEngine, OcrError};

    use super::*;

    /// Engine that counts invocations, for verifying rejection ordering.
    struct SpyEngine {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl OcrEngine for SpyEngine {
        fn name(&self) -> &'static str {
            "spy"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn recognize(&self, _image: &[u8], _language: &str) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("ABC Co. Invoice INV-1 Total: $110.00 Tax: $10.00".to_string())
        }
    }

    /// Client that counts invocations and replies with a fixed completion.
    struct SpyClient {
        calls: Arc<AtomicUsize>,
        response: String,
    }

    #[async_trait]
    impl CompletionClient for SpyClient {
        async fn complete(&self, _: &str, _: &str) -> Result<String, crate::extract::ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    struct Spies {
        ocr_calls: Arc<AtomicUsize>,
        ai_calls: Arc<AtomicUsize>,
    }

    fn pipeline_with_spies(max_upload_bytes: usize, response: &str) -> (InvoicePipeline, Spies) {
        let ocr_calls = Arc::new(AtomicUsize::new(0));
        let ai_calls = Arc::new(AtomicUsize::new(0));

        let loader = DocumentLoader::new(&RenderConfig::default());
        let engines: Vec<Arc<dyn OcrEngine>> = vec![Arc::new(SpyEngine {
            calls: ocr_calls.clone(),
        })];
        let ocr = OcrService::with_engines(engines, "eng");
        let extractor = ExtractionService::new(Arc::new(SpyClient {
            calls: ai_calls.clone(),
            response: response.to_string(),
        }));

        (
            InvoicePipeline::new(loader, ocr, extractor, max_upload_bytes),
            Spies {
                ocr_calls,
                ai_calls,
            },
        )
    }

    const STUB_RESPONSE: &str = r#"{
        "supplier_name": "ABC Co.",
        "invoice_number": "INV-1",
        "currency": "USD",
        "subtotal": 100.0,
        "tax_amount": 10.0,
        "tax_rate": 10.0,
        "total_amount": 110.0,
        "line_items": []
    }"#;

    fn png_upload() -> (Vec<u8>, DeclaredType) {
        (
            vec![0x89, 0x50, 0x4E, 0x47, 1, 2, 3],
            DeclaredType {
                content_type: Some("image/png".to_string()),
                file_name: Some("invoice.png".to_string()),
            },
        )
    }

    #[tokio::test]
    async fn test_png_upload_extracts() {
        let (pipeline, _) = pipeline_with_spies(1024, STUB_RESPONSE);
        let (data, declared) = png_upload();

        let extraction = pipeline.process(&data, &declared).await.unwrap();
        assert_eq!(extraction.record.invoice_number.as_deref(), Some("INV-1"));
        assert!(extraction.ocr_text.contains("INV-1"));
    }

    #[tokio::test]
    async fn test_jpeg_upload_extracts() {
        let (pipeline, _) = pipeline_with_spies(1024, STUB_RESPONSE);

        let declared = DeclaredType {
            content_type: Some("image/jpeg".to_string()),
            file_name: Some("invoice.jpg".to_string()),
        };
        let data = vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3];

        let extraction = pipeline.process(&data, &declared).await.unwrap();
        assert_eq!(extraction.record.currency, "USD");
        assert_eq!(
            extraction.record.total_amount,
            rust_decimal::Decimal::from_str("110.0").unwrap()
        );
    }

    #[tokio::test]
    async fn test_unsupported_type_rejected_before_any_work() {
        let (pipeline, spies) = pipeline_with_spies(1024, STUB_RESPONSE);

        let declared = DeclaredType {
            content_type: Some("text/plain".to_string()),
            file_name: Some("invoice.txt".to_string()),
        };
        let result = pipeline.process(b"some text", &declared).await;

        assert!(matches!(
            result,
            Err(PipelineError::UnsupportedMediaType { .. })
        ));
        assert_eq!(spies.ocr_calls.load(Ordering::SeqCst), 0);
        assert_eq!(spies.ai_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_rejected_before_loader() {
        let (pipeline, spies) = pipeline_with_spies(16, STUB_RESPONSE);
        let (data, declared) = png_upload();
        let big = [data, vec![0u8; 64]].concat();

        let result = pipeline.process(&big, &declared).await;

        assert!(matches!(result, Err(PipelineError::PayloadTooLarge { .. })));
        assert_eq!(spies.ocr_calls.load(Ordering::SeqCst), 0);
        assert_eq!(spies.ai_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_declared_type_beats_extension() {
        let (pipeline, spies) = pipeline_with_spies(1024, STUB_RESPONSE);

        // Declared text/plain must lose even with a .png file name
        let declared = DeclaredType {
            content_type: Some("text/plain".to_string()),
            file_name: Some("invoice.png".to_string()),
        };
        let result = pipeline.process(b"anything", &declared).await;

        assert!(matches!(
            result,
            Err(PipelineError::UnsupportedMediaType { .. })
        ));
        assert_eq!(spies.ocr_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_magic_bytes_fallback() {
        let (pipeline, _) = pipeline_with_spies(1024, STUB_RESPONSE);

        let declared = DeclaredType::default();
        let data = vec![0x89, 0x50, 0x4E, 0x47, 1, 2, 3];

        let extraction = pipeline.process(&data, &declared).await.unwrap();
        assert_eq!(extraction.record.currency, "USD");
    }

    #[tokio::test]
    async fn test_malformed_completion_maps_to_business_error() {
        let (pipeline, _) = pipeline_with_spies(1024, "this is not json");
        let (data, declared) = png_upload();

        let result = pipeline.process(&data, &declared).await;
        match result {
            Err(err @ PipelineError::Extract(ExtractError::MalformedResponse { .. })) => {
                assert_eq!(err.status_code(), StatusCode::OK);
            }
            other => panic!(
                "expected malformed response, got {:?}",
                other.map(|e| e.record)
            ),
        }
    }

    #[test]
    fn test_status_codes() {
        let unsupported = PipelineError::UnsupportedMediaType {
            declared: "text/plain".to_string(),
        };
        assert_eq!(
            unsupported.status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );

        let too_large = PipelineError::PayloadTooLarge { size: 11, max: 10 };
        assert_eq!(too_large.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        let empty = PipelineError::Document(DocumentError::EmptyDocument);
        assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);

        let ocr = PipelineError::Ocr(OcrError::NoText);
        assert_eq!(ocr.status_code(), StatusCode::OK);
    }
}
