//! LLM Gateway client.
//!
//! - [`LlmGateway`] -- the single capability the chat service needs.
//! - [`gemini::GeminiGateway`] -- implementation over the Gemini
//!   `generateContent` REST endpoint.
//! - [`reply`] -- turning model output text into a [`RawReply`].

pub mod gemini;
pub mod reply;

use async_trait::async_trait;
use tutor_core::chat::RawReply;

pub use gemini::{GeminiConfig, GeminiGateway};

/// Errors from the LLM Gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The gateway did not answer within the configured bound.
    #[error("gateway request timed out")]
    Timeout,

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("gateway API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The gateway answered, but not with a usable reply.
    #[error("malformed gateway reply: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Request(err)
        }
    }
}

/// Produces a character reply for a fully composed prompt.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<RawReply, GatewayError>;
}
