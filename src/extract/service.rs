//! Extraction service
//!
//! Ties the prompt, the completion client, and schema validation together.

use std::sync::Arc;

use crate::invoice::InvoiceRecord;
use crate::ocr::RecognizedText;

use super::client::CompletionClient;
use super::error::ExtractError;
use super::{prompt, schema};

/// Orchestrates one extraction round trip.
pub struct ExtractionService {
    client: Arc<dyn CompletionClient>,
}

impl ExtractionService {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Extract an invoice record from recognized text.
    ///
    /// Stateless: identical text against a deterministic endpoint yields an
    /// identical record.
    pub async fn extract(&self, text: &RecognizedText) -> Result<InvoiceRecord, ExtractError> {
        let combined = text.combined();
        let user_prompt = prompt::user_prompt(&combined);

        tracing::debug!(chars = combined.len(), "Requesting invoice extraction");
        let completion = self
            .client
            .complete(prompt::SYSTEM_PROMPT, &user_prompt)
            .await?;

        tracing::debug!(chars = completion.len(), "Completion received");
        schema::parse_invoice(&completion)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::ocr::PageText;

    use super::*;

    /// Deterministic stub endpoint
    struct StubClient {
        response: String,
    }

    #[async_trait]
    impl CompletionClient for StubClient {
        async fn complete(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
        ) -> Result<String, ExtractError> {
            Ok(self.response.clone())
        }
    }

    fn recognized(text: &str) -> RecognizedText {
        RecognizedText::new(vec![PageText {
            page: 0,
            text: text.to_string(),
        }])
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

    #[tokio::test]
    async fn test_extracts_record_from_stub() {
        let service = ExtractionService::new(Arc::new(StubClient {
            response: STUB_RESPONSE.to_string(),
        }));
        let text = recognized("ABC Co. Invoice INV-1 Total: $110.00 Tax: $10.00");

        let record = service.extract(&text).await.unwrap();
        assert_eq!(record.supplier_name.as_deref(), Some("ABC Co."));
        assert_eq!(record.currency, "USD");
        assert!(record.line_items.is_empty());
    }

    #[tokio::test]
    async fn test_extract_is_idempotent() {
        let service = ExtractionService::new(Arc::new(StubClient {
            response: STUB_RESPONSE.to_string(),
        }));
        let text = recognized("ABC Co. Invoice INV-1 Total: $110.00 Tax: $10.00");

        let first = service.extract(&text).await.unwrap();
        let second = service.extract(&text).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_client_error_propagates() {
        struct FailingClient;

        #[async_trait]
        impl CompletionClient for FailingClient {
            async fn complete(&self, _: &str, _: &str) -> Result<String, ExtractError> {
                Err(ExtractError::Upstream {
                    status: 401,
                    message: "invalid api key".to_string(),
                })
            }
        }

        let service = ExtractionService::new(Arc::new(FailingClient));
        let result = service.extract(&recognized("some invoice text")).await;

        assert!(matches!(
            result,
            Err(ExtractError::Upstream { status: 401, .. })
        ));
    }
}
