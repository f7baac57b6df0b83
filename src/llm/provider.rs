use async_trait::async_trait;
use crate::errors::ResearchError;
use super::types::LLMResponse;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Free-form text completion. One round-trip, no retry.
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<LLMResponse, ResearchError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;
}
