use std::sync::Arc;

use tracing::info;

use crate::errors::ResearchError;
use crate::llm::LLMProvider;
use crate::models::{ProviderResult, SearchResult};
use super::prompt::{firmographic_prompt, multi_source_prompt, SYSTEM_PROMPT};

/// Turns provider payloads into a markdown report with one completion call.
#[derive(Clone)]
pub struct ReportSynthesizer {
    llm: Arc<dyn LLMProvider>,
}

impl ReportSynthesizer {
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        Self { llm }
    }

    pub async fn synthesize(
        &self,
        company_name: &str,
        enrichment: &ProviderResult,
        firmographic: &ProviderResult,
        customers: &[SearchResult],
    ) -> Result<String, ResearchError> {
        let prompt = multi_source_prompt(company_name, enrichment, firmographic, customers);
        self.complete(&prompt).await
    }

    pub async fn synthesize_firmographic(
        &self,
        website: &str,
        firmographic: &ProviderResult,
    ) -> Result<String, ResearchError> {
        let prompt = firmographic_prompt(website, firmographic);
        self.complete(&prompt).await
    }

    async fn complete(&self, prompt: &str) -> Result<String, ResearchError> {
        info!(
            provider = self.llm.provider_name(),
            model = self.llm.model_name(),
            prompt_chars = prompt.len(),
            "Generating report"
        );

        let response = self
            .llm
            .complete(prompt, Some(SYSTEM_PROMPT))
            .await
            .map_err(|e| match e {
                ResearchError::Synthesis(msg) => ResearchError::Synthesis(msg),
                other => ResearchError::Synthesis(other.to_string()),
            })?;

        let report = response.content.trim();
        if report.is_empty() {
            return Err(ResearchError::Synthesis("LLM returned an empty report".into()));
        }
        Ok(report.to_string())
    }
}
