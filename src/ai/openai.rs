//! OpenAI provider
//!
//! Thin client over the chat completions endpoint.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AiError, AiJudge};
use crate::models::AiProvider;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug)]
pub struct OpenAiJudge {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiJudge {
    pub fn new(api_key: String, model: String) -> Result<Self, AiError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AiError::ProviderError(e.to_string()))?;

        tracing::info!(model = %model, "Initialized OpenAI judge");

        Ok(Self {
            http_client,
            api_key,
            model,
        })
    }
}

#[async_trait::async_trait]
impl AiJudge for OpenAiJudge {
    fn provider(&self) -> AiProvider {
        AiProvider::OpenAi
    }

    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.7,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", OPENAI_BASE_URL))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::ProviderError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::ProviderError(format!(
                "OpenAI API returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponseFormat(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                AiError::InvalidResponseFormat("OpenAI response contained no choices".into())
            })
    }
}
