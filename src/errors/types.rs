use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
