//! OCR Engines
//!
//! Defines the engine trait and implementations for the supported backends.

use async_trait::async_trait;

use crate::config::OcrConfig;

use super::types::OcrError;

/// OCR engine trait
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Engine name for logging
    fn name(&self) -> &'static str;

    /// Check if the engine is reachable/installed
    async fn is_available(&self) -> bool;

    /// Recognize all text in one page image.
    ///
    /// Engines may have significant first-call latency (model loading);
    /// callers must not treat a slow first call as failure.
    async fn recognize(&self, image_data: &[u8], language: &str) -> Result<String, OcrError>;
}

/// Ollama vision model engine
pub struct OllamaEngine {
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "llava", "bakllava")
    model: String,
}

impl OllamaEngine {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            base_url: config.ollama_url.clone(),
            model: config.ollama_model.clone(),
        }
    }
}

#[async_trait]
impl OcrEngine for OllamaEngine {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        let client = reqwest::Client::new();
        let url = format!("{}/api/tags", self.base_url);

        match client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn recognize(&self, image_data: &[u8], language: &str) -> Result<String, OcrError> {
        use base64::Engine;

        let client = reqwest::Client::new();
        let url = format!("{}/api/generate", self.base_url);

        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image_data);

        let prompt = format!(
            "Transcribe every piece of text visible in this document image, \
             preserving the reading order. The text is in '{}'. \
             Return only the transcribed text, nothing else.",
            language
        );

        let request = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "images": [image_base64],
            "stream": false
        });

        let response = client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::Api(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Api(format!("Ollama returned {}: {}", status, body)));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OcrError::Api(format!("Failed to parse response: {}", e)))?;

        let text = result["response"].as_str().unwrap_or("").trim().to_string();

        Ok(text)
    }
}

/// Tesseract OCR engine (subprocess)
#[cfg(feature = "ocr-tesseract")]
pub struct TesseractEngine;

#[cfg(feature = "ocr-tesseract")]
#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn is_available(&self) -> bool {
        std::process::Command::new("tesseract")
            .arg("--version")
            .output()
            .is_ok()
    }

    async fn recognize(&self, image_data: &[u8], language: &str) -> Result<String, OcrError> {
        use std::process::Command;

        let temp_dir = std::env::temp_dir();
        let input_path = temp_dir.join(format!("factura_ocr_in_{}.png", uuid::Uuid::new_v4()));
        let output_path = temp_dir.join(format!("factura_ocr_out_{}", uuid::Uuid::new_v4()));

        std::fs::write(&input_path, image_data)
            .map_err(|e| OcrError::Processing(format!("Failed to write temp file: {}", e)))?;

        let output = Command::new("tesseract")
            .arg(&input_path)
            .arg(&output_path)
            .arg("-l")
            .arg(language)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("3")
            .output()
            .map_err(|e| OcrError::Processing(format!("Failed to run tesseract: {}", e)))?;

        let _ = std::fs::remove_file(&input_path);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Processing(format!("Tesseract failed: {}", stderr)));
        }

        let output_file = format!("{}.txt", output_path.display());
        let text = std::fs::read_to_string(&output_file)
            .map_err(|e| OcrError::Processing(format!("Failed to read output: {}", e)))?;

        let _ = std::fs::remove_file(&output_file);

        Ok(text.trim().to_string())
    }
}

/// Mock engine for testing
#[cfg(test)]
pub(crate) struct MockEngine {
    pub pages: Vec<Result<String, String>>,
    pub available: bool,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockEngine {
    pub fn returning(pages: Vec<&str>) -> Self {
        Self {
            pages: pages.into_iter().map(|p| Ok(p.to_string())).collect(),
            available: true,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl OcrEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, _image_data: &[u8], _language: &str) -> Result<String, OcrError> {
        let call = self
            .calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match self.pages.get(call) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(OcrError::Processing(message.clone())),
            None => Ok(String::new()),
        }
    }
}
