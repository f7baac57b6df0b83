use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::ResearchError;
use super::provider::LLMProvider;
use super::types::LLMResponse;

const DEFAULT_MODEL: &str = "o3";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, model: Option<&str>) -> Self {
        Self::with_base_url(api_key, model, "https://api.openai.com/v1")
    }

    pub fn with_base_url(api_key: &str, model: Option<&str>, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<LLMResponse, ResearchError> {
        let mut messages = Vec::new();
        if let Some(sys) = system {
            messages.push(json!({"role": "system", "content": sys}));
        }
        messages.push(json!({"role": "user", "content": prompt}));

        let body = json!({
            "model": self.model,
            "messages": messages,
        });

        let resp = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ResearchError::Synthesis(format!("OpenAI request failed: {}", e)))?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(ResearchError::Synthesis("OpenAI rate limit or quota exceeded".into()));
        }
        if status.as_u16() == 401 {
            return Err(ResearchError::Synthesis("Invalid OpenAI API key".into()));
        }

        let data: Value = resp.json().await
            .map_err(|e| ResearchError::Synthesis(format!("Failed to parse OpenAI response: {}", e)))?;

        if let Some(error) = data.get("error") {
            return Err(ResearchError::Synthesis(error["message"].as_str().unwrap_or("Unknown").to_string()));
        }

        let content = data["choices"][0]["message"]["content"].as_str()
            .ok_or_else(|| ResearchError::Synthesis("No content in OpenAI response".into()))?
            .to_string();
        let input_tokens = data["usage"]["prompt_tokens"].as_u64();
        let output_tokens = data["usage"]["completion_tokens"].as_u64();

        debug!(model = %self.model, input_tokens, output_tokens, "OpenAI completion");

        Ok(LLMResponse {
            content,
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &str { "openai" }
    fn model_name(&self) -> &str { &self.model }
}
