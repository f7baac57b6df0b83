use serde::{Deserialize, Serialize};

/// A single web-search hit. Sequences of these are kept in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}
