//! OpenRouter Client
//!
//! LLM client implementation for the OpenRouter chat-completions API.

use async_trait::async_trait;
use serde::Deserialize;

use super::llm_client::LlmClient;
use crate::error::SectionsError;

/// Default OpenRouter model
const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";

/// OpenRouter chat-completions endpoint
const API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// OpenRouter API client
#[derive(Clone)]
pub struct OpenRouterClient {
    api_key: String,
    client: reqwest::Client,
    model: String,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client with the given API key
    pub fn new(api_key: String) -> Self {
        let model = std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self {
            api_key,
            client: reqwest::Client::new(),
            model,
        }
    }

    /// Create with a specific model
    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, SectionsError> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| SectionsError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Internal API call implementation
    async fn call_api(&self, system_prompt: &str, user_prompt: &str) -> Result<String, SectionsError> {
        let response = self
            .client
            .post(API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "model": &self.model,
                "messages": [
                    {"role": "system", "content": system_prompt},
                    {"role": "user", "content": user_prompt}
                ]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SectionsError::Upstream { status, body });
        }

        #[derive(Deserialize)]
        struct Message {
            content: Option<String>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct ApiResponse {
            choices: Vec<Choice>,
        }

        let api_response: ApiResponse = response.json().await?;
        api_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|text| !text.trim().is_empty())
            .ok_or(SectionsError::EmptyCompletion)
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String, SectionsError> {
        self.call_api(system_prompt, user_prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        "OpenRouter"
    }
}
