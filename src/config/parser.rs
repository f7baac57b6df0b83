use std::path::Path;

use tracing::info;

use crate::errors::ResearchError;
use super::types::{AppConfig, FileConfig};

/// Build the application configuration: environment first, then an optional YAML overlay.
pub async fn load_config(path: Option<&Path>) -> Result<AppConfig, ResearchError> {
    let mut config = AppConfig::from_env();
    if let Some(path) = path {
        let file = parse_config_file(path).await?;
        config.apply_file(file);
        info!(path = %path.display(), "Applied configuration file");
    }
    Ok(config)
}

pub async fn parse_config_file(path: &Path) -> Result<FileConfig, ResearchError> {
    if !path.exists() {
        return Err(ResearchError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(ResearchError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let err = parse_config_file(Path::new("/nonexistent/research.yaml")).await.unwrap_err();
        assert!(matches!(err, ResearchError::Config(_)));
    }

    #[tokio::test]
    async fn test_empty_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research.yaml");
        tokio::fs::write(&path, "").await.unwrap();
        let file = parse_config_file(&path).await.unwrap();
        assert!(file.providers.is_none());
    }

    #[tokio::test]
    async fn test_invalid_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research.yaml");
        tokio::fs::write(&path, "providers: [unclosed").await.unwrap();
        let err = parse_config_file(&path).await.unwrap_err();
        assert!(matches!(err, ResearchError::Yaml(_)));
    }

    #[tokio::test]
    async fn test_parses_pandoc_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("research.yaml");
        tokio::fs::write(&path, "pandoc_path: /usr/local/bin/pandoc\n").await.unwrap();
        let file = parse_config_file(&path).await.unwrap();
        assert_eq!(file.pandoc_path.as_deref(), Some("/usr/local/bin/pandoc"));
    }
}
