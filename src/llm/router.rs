use crate::config::LLMConfig;
use crate::errors::ResearchError;
use super::provider::LLMProvider;
use super::anthropic::AnthropicProvider;
use super::openai::OpenAIProvider;

pub fn create_provider(config: &LLMConfig) -> Result<Box<dyn LLMProvider>, ResearchError> {
    let api_key = config.api_key.as_deref().ok_or_else(|| {
        ResearchError::Config(format!("No API key configured for LLM provider '{}'", config.provider))
    })?;
    let model = config.model.as_deref();

    match config.provider.as_str() {
        "openai" => Ok(Box::new(match config.base_url.as_deref() {
            Some(url) => OpenAIProvider::with_base_url(api_key, model, url),
            None => OpenAIProvider::new(api_key, model),
        })),
        "anthropic" => Ok(Box::new(match config.base_url.as_deref() {
            Some(url) => AnthropicProvider::with_base_url(api_key, model, url),
            None => AnthropicProvider::new(api_key, model),
        })),
        other => Err(ResearchError::Config(format!("Unknown LLM provider: {}", other))),
    }
}
