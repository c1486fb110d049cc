//! OCR Module
//!
//! Converts page images into recognized text for the extraction
//! orchestrator.
//!
//! Supported engines:
//! - Ollama vision models (local LLM over HTTP)
//! - Tesseract (subprocess, behind the `ocr-tesseract` feature)
//!
//! The service invokes one engine per page in page order and concatenates
//! the fragments; a failure on any page fails the whole document, since
//! downstream extraction needs full-document context.

mod engine;
mod service;
mod types;

pub use engine::{OcrEngine, OllamaEngine};
pub use service::OcrService;
pub use types::{OcrError, PageText, RecognizedText, PAGE_BREAK};

#[cfg(feature = "ocr-tesseract")]
pub use engine::TesseractEngine;
