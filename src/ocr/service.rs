//! OCR Service
//!
//! Runs one engine over every page of a document, in page order, and
//! assembles the recognized text.

use std::sync::Arc;

use crate::config::OcrConfig;
use crate::document::PageImage;

use super::engine::{OcrEngine, OllamaEngine};
use super::types::{OcrError, PageText, RecognizedText};

/// Shortest combined text considered meaningful.
const MIN_TEXT_LEN: usize = 10;

/// OCR service for whole-document recognition.
pub struct OcrService {
    engines: Vec<Arc<dyn OcrEngine>>,
    language: String,
}

impl OcrService {
    /// Create the service with the engines the configuration enables.
    pub fn new(config: &OcrConfig) -> Self {
        let mut engines: Vec<Arc<dyn OcrEngine>> = Vec::new();

        #[cfg(feature = "ocr-tesseract")]
        engines.push(Arc::new(super::engine::TesseractEngine));

        engines.push(Arc::new(OllamaEngine::new(config)));

        Self {
            engines,
            language: config.language.clone(),
        }
    }

    /// Create the service with explicit engines. Used by tests and by
    /// deployments that force a specific backend.
    pub fn with_engines(engines: Vec<Arc<dyn OcrEngine>>, language: &str) -> Self {
        Self {
            engines,
            language: language.to_string(),
        }
    }

    /// Recognize an ordered sequence of page images.
    ///
    /// The whole document goes through a single engine so the reading
    /// context stays consistent. Any page failure fails the request.
    pub async fn recognize(&self, pages: &[PageImage]) -> Result<RecognizedText, OcrError> {
        let engine = self.pick_engine().await?;

        let mut fragments = Vec::with_capacity(pages.len());
        for page in pages {
            let raw = engine
                .recognize(&page.data, &self.language)
                .await
                .map_err(|e| OcrError::Page {
                    page: page.index,
                    message: e.to_string(),
                })?;

            tracing::debug!(
                engine = engine.name(),
                page = page.index,
                chars = raw.len(),
                "Page recognized"
            );

            fragments.push(PageText {
                page: page.index,
                text: clean_text(&raw),
            });
        }

        let text = RecognizedText::new(fragments);
        if text.text_len() < MIN_TEXT_LEN {
            return Err(OcrError::NoText);
        }

        Ok(text)
    }

    /// First engine that answers its availability probe wins.
    async fn pick_engine(&self) -> Result<Arc<dyn OcrEngine>, OcrError> {
        for engine in &self.engines {
            if engine.is_available().await {
                return Ok(engine.clone());
            }
            tracing::warn!(engine = engine.name(), "OCR engine unavailable, trying next");
        }
        Err(OcrError::NoEngineAvailable)
    }
}

/// Normalize recognized text: collapse whitespace runs within lines and
/// drop empty lines, keeping line order.
fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::super::engine::MockEngine;
    use super::super::types::PAGE_BREAK;
    use super::*;

    fn page(index: usize) -> PageImage {
        PageImage {
            index,
            data: vec![0u8; 4],
        }
    }

    #[test]
    fn test_clean_text() {
        let raw = "  Invoice   INV-1  \n\n\n   Total:   $110.00\t\n";
        assert_eq!(clean_text(raw), "Invoice INV-1\nTotal: $110.00");
    }

    #[tokio::test]
    async fn test_pages_recognized_in_order() {
        let engine: Arc<dyn OcrEngine> = Arc::new(MockEngine::returning(vec![
            "first page text here",
            "second page text here",
        ]));
        let service = OcrService::with_engines(vec![engine], "eng");

        let text = service.recognize(&[page(0), page(1)]).await.unwrap();

        assert_eq!(text.pages().len(), 2);
        assert_eq!(text.pages()[0].page, 0);
        assert_eq!(text.pages()[0].text, "first page text here");
        assert_eq!(text.pages()[1].page, 1);
        assert_eq!(
            text.combined(),
            format!("first page text here{}second page text here", PAGE_BREAK)
        );
    }

    #[tokio::test]
    async fn test_page_failure_is_fatal() {
        let engine: Arc<dyn OcrEngine> = Arc::new(MockEngine {
            pages: vec![
                Ok("first page text here".to_string()),
                Err("engine crashed".to_string()),
            ],
            available: true,
            calls: std::sync::atomic::AtomicUsize::new(0),
        });
        let service = OcrService::with_engines(vec![engine], "eng");

        let result = service.recognize(&[page(0), page(1)]).await;
        match result {
            Err(OcrError::Page { page, message }) => {
                assert_eq!(page, 1);
                assert!(message.contains("engine crashed"));
            }
            other => panic!("expected page failure, got {:?}", other.map(|t| t.combined())),
        }
    }

    #[tokio::test]
    async fn test_too_little_text_rejected() {
        let engine: Arc<dyn OcrEngine> = Arc::new(MockEngine::returning(vec!["ab"]));
        let service = OcrService::with_engines(vec![engine], "eng");

        let result = service.recognize(&[page(0)]).await;
        assert!(matches!(result, Err(OcrError::NoText)));
    }

    #[tokio::test]
    async fn test_no_engine_available() {
        let engine: Arc<dyn OcrEngine> = Arc::new(MockEngine {
            pages: vec![],
            available: false,
            calls: std::sync::atomic::AtomicUsize::new(0),
        });
        let service = OcrService::with_engines(vec![engine], "eng");

        let result = service.recognize(&[page(0)]).await;
        assert!(matches!(result, Err(OcrError::NoEngineAvailable)));
    }
}
