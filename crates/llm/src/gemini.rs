//! REST client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tutor_core::chat::RawReply;

use crate::reply::parse_reply;
use crate::{GatewayError, LlmGateway};

/// Connection settings for [`GeminiGateway`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL up to and including the API version,
    /// e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub base_url: String,
    pub max_output_tokens: u32,
    pub timeout: Duration,
}

/// HTTP client for a single Gemini model.
pub struct GeminiGateway {
    client: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiGateway {
    /// Build a client whose every request is bounded by `config.timeout`.
    pub fn new(config: GeminiConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GatewayError::Request)?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Ensure the response has a success status code, otherwise capture
    /// the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Concatenate the text parts of the first candidate.
    fn candidate_text(response: GenerateResponse) -> Result<String, GatewayError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Malformed("no candidates in response".into()))?;
        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.trim().is_empty() {
            return Err(GatewayError::Malformed("candidate has no text".into()));
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn generate(&self, prompt: &str) -> Result<RawReply, GatewayError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "maxOutputTokens": self.config.max_output_tokens,
                "responseMimeType": "application/json",
            },
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        // Reading the body can still hit the client timeout; only decoding
        // failures count as malformed.
        let bytes = response.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::Malformed(format!("unexpected response body: {e}")))?;

        let text = Self::candidate_text(parsed)?;
        tracing::debug!(model = %self.config.model, chars = text.len(), "Gateway replied");
        parse_reply(&text)
    }
}
