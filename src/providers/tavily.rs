use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::errors::ResearchError;
use crate::models::{ProviderKind, SearchResult};
use crate::utils::identifier::display_name_from_identifier;
use super::cache::ResponseCache;
use super::{cached_fetch, missing_credential, send_json, SearchProvider};

const MAX_RESULTS: u32 = 5;

/// Client for the Tavily search API. Searches for the company's major customers.
pub struct TavilyClient {
    client: Client,
    api_key: String,
    base_url: String,
    cache: ResponseCache,
}

impl TavilyClient {
    pub fn new(config: &ProviderConfig, cache: ResponseCache) -> Result<Self, ResearchError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| missing_credential(ProviderKind::Tavily))?;

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

pub fn customers_query(company_name: &str) -> String {
    format!("Who are the major/enterprise customers of {}?", company_name)
}

/// Turn a search response into ranked hits, dropping entries without a URL.
pub fn parse_results(response: &Value) -> Vec<SearchResult> {
    response["results"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter(|item| item["url"].as_str().is_some_and(|u| !u.is_empty()))
                .filter_map(|item| match serde_json::from_value::<SearchResult>(item.clone()) {
                    Ok(hit) => Some(hit),
                    Err(e) => {
                        debug!(error = %e, "Skipping malformed search result");
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn fetch(&self, identifier: &str) -> Result<Vec<SearchResult>, ResearchError> {
        // The search runs alongside the other providers, so only the fallback name is known.
        let query = customers_query(&display_name_from_identifier(identifier));

        let raw = cached_fetch(&self.cache, ProviderKind::Tavily, identifier, || {
            let request = self
                .client
                .post(format!("{}/search", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&json!({
                    "query": query,
                    "max_results": MAX_RESULTS,
                    "search_depth": "advanced",
                }));
            send_json(ProviderKind::Tavily, request, &self.api_key)
        })
        .await?;

        Ok(parse_results(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customers_query() {
        assert_eq!(customers_query("Acme"), "Who are the major/enterprise customers of Acme?");
    }

    #[test]
    fn test_parse_results_keeps_rank_and_skips_bad_items() {
        let response = json!({
            "results": [
                {"url": "https://a.example.com", "title": "A", "score": 0.9},
                {"title": "no url", "score": 0.8},
                {"url": "https://b.example.com", "title": "B", "score": 0.7, "published_date": "2024-01-01", "content": "B content"},
                {"url": "https://c.example.com"}
            ]
        });
        let hits = parse_results(&response);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "A");
        assert_eq!(hits[1].content.as_deref(), Some("B content"));
    }

    #[test]
    fn test_parse_results_missing_array() {
        assert!(parse_results(&json!({"answer": null})).is_empty());
    }
}
