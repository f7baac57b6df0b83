use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::ProviderConfig;
use crate::errors::ResearchError;
use crate::models::{ProviderKind, ProviderResult};
use super::cache::ResponseCache;
use super::{cached_fetch, missing_credential, send_json, CompanyDataProvider};

/// Client for the Apollo organization enrichment endpoint.
pub struct ApolloClient {
    client: Client,
    api_key: String,
    base_url: String,
    cache: ResponseCache,
}

impl ApolloClient {
    /// Fails with a configuration error when no API key is configured.
    pub fn new(config: &ProviderConfig, cache: ResponseCache) -> Result<Self, ResearchError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| missing_credential(ProviderKind::Apollo))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ResearchError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache,
        })
    }
}

#[async_trait]
impl CompanyDataProvider for ApolloClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Apollo
    }

    async fn fetch(&self, identifier: &str) -> Result<ProviderResult, ResearchError> {
        let raw = cached_fetch(&self.cache, ProviderKind::Apollo, identifier, || {
            let request = self
                .client
                .get(format!("{}/organizations/enrich", self.base_url))
                .query(&[("domain", identifier)])
                .header("accept", "application/json")
                .header("Cache-Control", "no-cache")
                .header("x-api-key", &self.api_key);
            send_json(ProviderKind::Apollo, request, &self.api_key)
        })
        .await?;

        Ok(ProviderResult::from_raw(raw))
    }
}
