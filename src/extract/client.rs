//! AI completion client
//!
//! Talks to an OpenAI-compatible chat completions endpoint with a bearer
//! credential. The client assumes nothing about the response beyond
//! "choices[0].message.content holds the completion text".

use std::time::Duration;

use async_trait::async_trait;

use crate::config::AiConfig;

use super::error::ExtractError;

/// Completion client trait
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one completion and return the raw completion text.
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, ExtractError>;
}

/// Client for the Cerebras chat completions API.
pub struct CerebrasClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl CerebrasClient {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl CompletionClient for CerebrasClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ExtractError> {
        // Low temperature for consistent, factual extraction
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "temperature": 0.1,
            "max_tokens": 2000,
            "response_format": {"type": "json_object"},
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ExtractError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ExtractError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ExtractError::Transport(format!("Failed to read response body: {}", e)))?;

        let content = result["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ExtractError::EmptyCompletion)?;

        Ok(content.to_string())
    }
}
