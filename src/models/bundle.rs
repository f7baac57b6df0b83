use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::provider_result::{ProviderKind, ProviderResult};
use super::search_result::SearchResult;

/// Raw output of one provider, kept for passthrough.
#[derive(Debug, Clone)]
pub enum ProviderPayload {
    Company(ProviderResult),
    Search(Vec<SearchResult>),
}

impl ProviderPayload {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Company(result) => result.raw.clone(),
            Self::Search(hits) => serde_json::to_value(hits).unwrap_or(Value::Array(Vec::new())),
        }
    }
}

/// Everything one research request produced: the report plus the data it was built from.
#[derive(Debug, Clone)]
pub struct ResearchBundle {
    pub company_name: String,
    pub domain: String,
    pub report: String,
    pub payloads: BTreeMap<ProviderKind, ProviderPayload>,
}

impl ResearchBundle {
    /// Raw payloads keyed the way response bodies expose them.
    pub fn raw_data(&self) -> Value {
        let map: Map<String, Value> = self
            .payloads
            .iter()
            .map(|(kind, payload)| (kind.raw_data_key().to_string(), payload.to_json()))
            .collect();
        Value::Object(map)
    }

    pub fn data_sources(&self) -> Vec<&'static str> {
        self.payloads.keys().map(|k| k.display_name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_data_keys() {
        let mut payloads = BTreeMap::new();
        payloads.insert(
            ProviderKind::Apollo,
            ProviderPayload::Company(ProviderResult::from_raw(json!({"organization": {"name": "Acme"}}))),
        );
        payloads.insert(
            ProviderKind::Tavily,
            ProviderPayload::Search(vec![SearchResult {
                url: "https://news.example.com/a".into(),
                title: "Acme wins".into(),
                score: 0.9,
                published_date: None,
                content: None,
            }]),
        );
        let bundle = ResearchBundle {
            company_name: "Acme".into(),
            domain: "acme.com".into(),
            report: "# Acme".into(),
            payloads,
        };
        let raw = bundle.raw_data();
        assert_eq!(raw["apollo_data"]["organization"]["name"], "Acme");
        assert_eq!(raw["tavily_customers"][0]["title"], "Acme wins");
        assert!(raw.get("coresignal_data").is_none());
        assert_eq!(bundle.data_sources(), vec!["Apollo Organization API", "Tavily Search API"]);
    }
}
