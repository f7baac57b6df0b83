use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ResearchError;
use crate::models::ProviderKind;
use crate::utils::identifier::identifier_slug;

/// Permanent on-disk store of raw provider responses, one file per
/// `(provider, identifier)`. Entries never expire; concurrent writers for the
/// same identifier overwrite each other.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, kind: ProviderKind, identifier: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}", identifier_slug(identifier), kind.cache_suffix()))
    }

    /// Load a cached response. Unreadable or corrupt entries are treated as misses.
    pub async fn load(&self, kind: ProviderKind, identifier: &str) -> Option<Value> {
        let path = self.path_for(kind, identifier);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(provider = %kind, path = %path.display(), error = %e, "Failed to read cached response, refetching");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => {
                debug!(provider = %kind, path = %path.display(), "Loaded cached response");
                Some(value)
            }
            Err(e) => {
                warn!(provider = %kind, path = %path.display(), error = %e, "Cached response is not valid JSON, refetching");
                None
            }
        }
    }

    pub async fn store(&self, kind: ProviderKind, identifier: &str, value: &Value) -> Result<PathBuf, ResearchError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(kind, identifier);
        let json = serde_json::to_string_pretty(value)?;
        tokio::fs::write(&path, json).await?;
        debug!(provider = %kind, path = %path.display(), "Cached provider response");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_is_deterministic() {
        let cache = ResponseCache::new("/tmp/cache");
        assert_eq!(
            cache.path_for(ProviderKind::Apollo, "example.com"),
            PathBuf::from("/tmp/cache/example_com_apollo_api_response.json")
        );
        assert_eq!(
            cache.path_for(ProviderKind::CoreSignal, "https://www.example.com"),
            cache.path_for(ProviderKind::CoreSignal, "example.com")
        );
    }

    #[tokio::test]
    async fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().join("nested"));
        let value = json!({"organization": {"name": "Acme"}});
        cache.store(ProviderKind::Apollo, "acme.com", &value).await.unwrap();
        assert_eq!(cache.load(ProviderKind::Apollo, "acme.com").await, Some(value));
        assert_eq!(cache.load(ProviderKind::Tavily, "acme.com").await, None);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        let path = cache.path_for(ProviderKind::CoreSignal, "acme.com");
        tokio::fs::write(&path, "{not json").await.unwrap();
        assert_eq!(cache.load(ProviderKind::CoreSignal, "acme.com").await, None);
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        cache.store(ProviderKind::Apollo, "acme.com", &json!({"v": 1})).await.unwrap();
        cache.store(ProviderKind::Apollo, "acme.com", &json!({"v": 2})).await.unwrap();
        assert_eq!(cache.load(ProviderKind::Apollo, "acme.com").await, Some(json!({"v": 2})));
    }
}
