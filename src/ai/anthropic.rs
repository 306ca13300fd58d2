//! Anthropic provider
//!
//! Thin client over the messages endpoint.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AiError, AiJudge};
use crate::models::AiProvider;

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_TOKENS: u32 = 2048;

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Debug)]
pub struct AnthropicJudge {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicJudge {
    pub fn new(api_key: String, model: String) -> Result<Self, AiError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AiError::ProviderError(e.to_string()))?;

        tracing::info!(model = %model, "Initialized Anthropic judge");

        Ok(Self {
            http_client,
            api_key,
            model,
        })
    }
}

#[async_trait::async_trait]
impl AiJudge for AnthropicJudge {
    fn provider(&self) -> AiProvider {
        AiProvider::Anthropic
    }

    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/messages", ANTHROPIC_BASE_URL))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::ProviderError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::ProviderError(format!(
                "Anthropic API returned {}: {}",
                status, body
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponseFormat(e.to_string()))?;

        parsed
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| {
                AiError::InvalidResponseFormat("Anthropic response contained no content".into())
            })
    }
}
