//! Chat proxy: persona lookup, prompt composition, one bounded gateway call.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tutor_core::chat::{build_prompt, shape_reply, validate_message, Expression, Language, ReplyText};
use tutor_core::error::CoreError;
use tutor_db::Store;
use tutor_llm::{GatewayError, LlmGateway};

use crate::error::{AppError, AppResult};

/// Body of `POST /chat/{character_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub message: String,
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub character_id: String,
    pub expression: Expression,
    pub reply: ReplyText,
}

pub struct ChatService {
    store: Arc<dyn Store>,
    gateway: Arc<dyn LlmGateway>,
    timeout: Duration,
}

impl ChatService {
    pub fn new(store: Arc<dyn Store>, gateway: Arc<dyn LlmGateway>, timeout: Duration) -> Self {
        Self {
            store,
            gateway,
            timeout,
        }
    }

    /// Answer `request` in the voice of `character_id`.
    ///
    /// The character is resolved before anything else, so an unknown id
    /// never reaches the gateway.
    pub async fn reply(&self, character_id: &str, request: &ChatRequest) -> AppResult<ChatResponse> {
        let character = self
            .store
            .find_character(character_id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "Character",
                id: character_id.to_string(),
            })?;

        let message = validate_message(&request.message)?;
        let prompt = build_prompt(&character.persona(), request.language, message);

        tracing::debug!(
            character_id,
            user_id = request.user_id.as_deref().unwrap_or("-"),
            language = request.language.as_str(),
            "Calling language gateway"
        );
        let raw = match tokio::time::timeout(self.timeout, self.gateway.generate(&prompt)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(GatewayError::Timeout)) | Err(_) => {
                tracing::warn!(character_id, timeout_secs = self.timeout.as_secs(), "Gateway timed out");
                return Err(CoreError::GatewayTimeout(self.timeout.as_secs()).into());
            }
            Ok(Err(err)) => return Err(AppError::Gateway(err)),
        };

        let shaped = shape_reply(raw)?;
        Ok(ChatResponse {
            character_id: character.id,
            expression: shaped.expression,
            reply: shaped.reply,
        })
    }
}
