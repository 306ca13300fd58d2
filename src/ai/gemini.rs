//! Gemini provider
//!
//! Thin client over the `generateContent` REST endpoint.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AiError, AiJudge};
use crate::models::AiProvider;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug)]
pub struct GeminiJudge {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiJudge {
    pub fn new(api_key: String, model: String) -> Result<Self, AiError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AiError::ProviderError(e.to_string()))?;

        tracing::info!(model = %model, "Initialized Gemini judge");

        Ok(Self {
            http_client,
            api_key,
            model,
        })
    }
}

#[async_trait::async_trait]
impl AiJudge for GeminiJudge {
    fn provider(&self) -> AiProvider {
        AiProvider::Gemini
    }

    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::ProviderError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::ProviderError(format!(
                "Gemini API returned {}: {}",
                status, body
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponseFormat(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                AiError::InvalidResponseFormat("Gemini response contained no candidates".into())
            })
    }
}
