//! Clients for the upstream data providers.
//!
//! Every client checks the [`ResponseCache`] first and performs at most one HTTP
//! call on a miss, persisting the raw response before returning it.

pub mod apollo;
pub mod cache;
pub mod coresignal;
pub mod tavily;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{redact_credentials, AppConfig};
use crate::errors::ResearchError;
use crate::models::{ProviderKind, ProviderResult, SearchResult};
use crate::utils::truncation::truncate_error;

pub use apollo::ApolloClient;
pub use cache::ResponseCache;
pub use coresignal::CoreSignalClient;
pub use tavily::TavilyClient;

/// A provider returning an opaque company payload.
#[async_trait]
pub trait CompanyDataProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn fetch(&self, identifier: &str) -> Result<ProviderResult, ResearchError>;
}

/// The web-search provider.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn fetch(&self, identifier: &str) -> Result<Vec<SearchResult>, ResearchError>;
}

/// The provider clients that could be built from the configuration. A missing
/// credential leaves its slot empty; requests needing it fail with a config error.
#[derive(Clone, Default)]
pub struct ProviderSet {
    pub enrichment: Option<Arc<dyn CompanyDataProvider>>,
    pub firmographic: Option<Arc<dyn CompanyDataProvider>>,
    pub search: Option<Arc<dyn SearchProvider>>,
}

impl ProviderSet {
    pub fn from_config(config: &AppConfig) -> Self {
        let cache = ResponseCache::new(config.cache_dir());

        let enrichment = ApolloClient::new(&config.apollo, cache.clone())
            .map(|c| Arc::new(c) as Arc<dyn CompanyDataProvider>)
            .map_err(|e| warn!(error = %e, "Enrichment provider disabled"))
            .ok();
        let firmographic = CoreSignalClient::new(&config.coresignal, cache.clone())
            .map(|c| Arc::new(c) as Arc<dyn CompanyDataProvider>)
            .map_err(|e| warn!(error = %e, "Multi-source provider disabled"))
            .ok();
        let search = TavilyClient::new(&config.tavily, cache)
            .map(|c| Arc::new(c) as Arc<dyn SearchProvider>)
            .map_err(|e| warn!(error = %e, "Search provider disabled"))
            .ok();

        Self { enrichment, firmographic, search }
    }

    pub fn enrichment(&self) -> Result<Arc<dyn CompanyDataProvider>, ResearchError> {
        self.enrichment
            .clone()
            .ok_or_else(|| missing_credential(ProviderKind::Apollo))
    }

    pub fn firmographic(&self) -> Result<Arc<dyn CompanyDataProvider>, ResearchError> {
        self.firmographic
            .clone()
            .ok_or_else(|| missing_credential(ProviderKind::CoreSignal))
    }

    pub fn search(&self) -> Result<Arc<dyn SearchProvider>, ResearchError> {
        self.search
            .clone()
            .ok_or_else(|| missing_credential(ProviderKind::Tavily))
    }
}

pub(crate) fn missing_credential(kind: ProviderKind) -> ResearchError {
    let var = match kind {
        ProviderKind::Apollo => "APOLLO_API_KEY",
        ProviderKind::CoreSignal => "CORESIGNAL_API_KEY",
        ProviderKind::Tavily => "TAVILY_API_KEY",
    };
    ResearchError::Config(format!("{} not set in environment variables", var))
}

/// Serve from cache, or run `request` once and cache its result.
pub(crate) async fn cached_fetch<F, Fut>(
    cache: &ResponseCache,
    kind: ProviderKind,
    identifier: &str,
    request: F,
) -> Result<Value, ResearchError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, ResearchError>>,
{
    if let Some(cached) = cache.load(kind, identifier).await {
        info!(provider = %kind, identifier, "Using cached provider response");
        return Ok(cached);
    }

    info!(provider = %kind, identifier, "Fetching from provider");
    let value = request().await?;
    let path = cache.store(kind, identifier, &value).await?;
    info!(provider = %kind, path = %path.display(), "Provider response saved");
    Ok(value)
}

/// Send a request and decode a JSON object body, mapping every failure to an upstream error.
pub(crate) async fn send_json(
    kind: ProviderKind,
    request: RequestBuilder,
    secret: &str,
) -> Result<Value, ResearchError> {
    let upstream = |msg: String| ResearchError::Upstream(redact_credentials(&msg, &[secret]));

    let resp = request
        .send()
        .await
        .map_err(|e| upstream(format!("{} request failed: {}", kind, e)))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(upstream(format!(
            "{} returned HTTP {}: {}",
            kind,
            status.as_u16(),
            truncate_error(&body)
        )));
    }

    let value: Value = resp
        .json()
        .await
        .map_err(|e| upstream(format!("Failed to parse {} response: {}", kind, e)))?;

    if !value.is_object() {
        return Err(upstream(format!("{} response is not a JSON object", kind)));
    }
    Ok(value)
}
