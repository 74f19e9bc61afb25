//! Gemini adapter for [`TextGenerator`].
//!
//! Sends one `generateContent` request per entity with a JSON response
//! schema and parses the first candidate's text as the structured result.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::catalog::SYSTEM_INSTRUCTION;
use crate::config::GeminiConfig;

use super::client::TextGenerator;
use super::error::GenerationError;
use super::prompt;
use super::types::{
    AdaptationRequest, AdaptationSuggestion, KnowledgeAreaRequest, KnowledgeAreaSuggestion,
};

/// Generator backed by Google's Generative Language API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: String,
        schema: Value,
    ) -> Result<T, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        });

        let url = self.config.endpoint();
        debug!(model = %self.config.model, "sending generateContent request");

        let resp = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = resp.json().await?;
        let text = candidate_text(&payload).ok_or(GenerationError::EmptyResponse)?;
        parse_structured(&text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_knowledge_area(
        &self,
        request: &KnowledgeAreaRequest,
    ) -> Result<KnowledgeAreaSuggestion, GenerationError> {
        self.generate_structured(
            prompt::knowledge_area_prompt(request),
            prompt::knowledge_area_schema(),
        )
        .await
    }

    async fn generate_adaptation(
        &self,
        request: &AdaptationRequest,
    ) -> Result<AdaptationSuggestion, GenerationError> {
        self.generate_structured(
            prompt::adaptation_prompt(request),
            prompt::adaptation_schema(),
        )
        .await
    }
}

/// Concatenated text parts of the first candidate, or `None` when blank.
fn candidate_text(payload: &Value) -> Option<String> {
    let parts = payload["candidates"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|c| c["content"]["parts"].as_array())?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Parse the model's JSON answer into `T`.
fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(serde_json::from_str(trimmed)?)
}
