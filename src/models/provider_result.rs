use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The external data sources a research request can draw on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// B2B enrichment API (Apollo).
    Apollo,
    /// Firmographic multi-source API (CoreSignal).
    CoreSignal,
    /// Web-search API (Tavily).
    Tavily,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apollo => "apollo",
            Self::CoreSignal => "coresignal",
            Self::Tavily => "tavily",
        }
    }

    /// Key under which the raw payload is passed through in responses.
    pub fn raw_data_key(&self) -> &'static str {
        match self {
            Self::Apollo => "apollo_data",
            Self::CoreSignal => "coresignal_data",
            Self::Tavily => "tavily_customers",
        }
    }

    /// Human readable source name for response summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Apollo => "Apollo Organization API",
            Self::CoreSignal => "CoreSignal Multi-Source API",
            Self::Tavily => "Tavily Search API",
        }
    }

    /// Suffix of the cache file name for this provider.
    pub fn cache_suffix(&self) -> &'static str {
        match self {
            Self::Apollo => "apollo_api_response.json",
            Self::CoreSignal => "coresignal_multisource_api_response.json",
            Self::Tavily => "tavily_customers_response.json",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One provider's payload for one company: the untouched JSON plus a typed view
/// of the few fields the pipeline reads.
#[derive(Debug, Clone)]
pub struct ProviderResult {
    pub raw: Value,
    pub view: CompanyView,
}

impl ProviderResult {
    pub fn from_raw(raw: Value) -> Self {
        let view = CompanyView::extract(&raw);
        Self { raw, view }
    }
}

/// Well-known optional fields, extracted defensively from an otherwise opaque payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyView {
    /// `organization.name` (enrichment provider).
    pub organization_name: Option<String>,
    /// `company_name` (multi-source provider).
    pub company_name: Option<String>,
    /// Top-level `name`.
    pub name: Option<String>,
    pub updates: Vec<CompanyUpdate>,
    pub competitors: Vec<Competitor>,
}

impl CompanyView {
    pub fn extract(raw: &Value) -> Self {
        Self {
            organization_name: non_empty_str(&raw["organization"]["name"]),
            company_name: non_empty_str(&raw["company_name"]),
            name: non_empty_str(&raw["name"]),
            updates: raw["company_updates"]
                .as_array()
                .map(|items| items.iter().filter(|v| v.is_object()).map(CompanyUpdate::from_value).collect())
                .unwrap_or_default(),
            competitors: raw["competitors"]
                .as_array()
                .map(|items| items.iter().filter(|v| v.is_object()).map(Competitor::from_value).collect())
                .unwrap_or_default(),
        }
    }
}

/// A company update / news post.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyUpdate {
    pub date: Option<String>,
    pub description: Option<String>,
    pub reactions_count: Option<u64>,
    pub comments_count: Option<u64>,
}

impl CompanyUpdate {
    pub fn from_value(value: &Value) -> Self {
        Self {
            date: non_empty_str(&value["date"]),
            description: value["description"].as_str().map(str::to_string),
            reactions_count: value["reactions_count"].as_u64(),
            comments_count: value["comments_count"].as_u64(),
        }
    }

    /// Parsed publication time, if the date is in a recognised format.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let date = self.date.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.and_utc());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
            return Some(dt.and_utc());
        }
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// A competitor entry. The whole object is kept for the prompt; only the score is typed.
#[derive(Debug, Clone, PartialEq)]
pub struct Competitor {
    pub name: Option<String>,
    pub similarity_score: Option<f64>,
    pub raw: Value,
}

impl Competitor {
    pub fn from_value(value: &Value) -> Self {
        Self {
            name: non_empty_str(&value["company_name"]).or_else(|| non_empty_str(&value["name"])),
            similarity_score: value["similarity_score"].as_f64(),
            raw: value.clone(),
        }
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
