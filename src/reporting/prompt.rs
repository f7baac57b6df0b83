use serde_json::Value;

use crate::models::{ProviderResult, SearchResult};
use super::formatter::{
    condensed_update, format_news_section, recent_update_indices, recent_updates, top_competitors,
    MAX_COMPETITORS, MAX_NEWS_ITEMS,
};

pub const SYSTEM_PROMPT: &str = "You are a research assistant specialized in company analysis.";

const REPORT_SECTIONS: &str = "\
Company Overview:
- Company Name
- Website
- Description
- Founded Year
- Status
- Type
Industry and Market:
- Industry
- Keywords
Location:
- HQ and other locations Address, City, State, Country
Contact Details:
- Emails, Phone no.
Leadership & Key Executives:
- Name, Title, LinkedIn Profile
Employee Insights:
- Employee Count
- Ratings
- Employees by Location
- Employees by Title
- Employee Growth
Financials:
- Annual Revenue
- Recent Financial Performance
Funding and Ownership:
- Funding Rounds
- Total Funding
- Recent Funding
- Private or Public
- Investors
Competitors:
- Name
- Revenue and total funding
Recent News:
- News Title
- News Summary
- News Date
- Source URL
Enterprise Customers
Online Presence:
- Website, LinkedIn links
- Followers
";

const INSTRUCTIONS: &str = "\
Instructions:
- Use only the provided data. Do not fabricate or add any information not present above.
- For each section, if data is missing or empty, state \"No relevant data found.\"
- Remove duplicates and ensure each entry is unique.
- Format the report in clear, well-structured markdown with the above sections. Each section should be a separate markdown heading.
- **IMPORTANT** Mention sources for each section. If it is a link create a markdown link. Mark N/A if no source is available.
- Extract the source url from the news item or corresponding company update description and add it to the news item.
- For search results, create a markdown link for the source url.
- **VERY IMPORTANT: Do NOT include any emojis, special characters, or non-ASCII symbols in the report as they break PDF generation. Use only standard text, numbers, and basic punctuation.**
";

const CUSTOMER_INFERENCE: &str = "\
- For the Enterprise Customers section, infer customers and clients from the company updates by looking for:
  * Direct mentions of company names as clients, customers, or partners
  * Success stories or case studies mentioning specific organizations
  * Announcements about new partnerships, collaborations, or deals
  * Posts celebrating client wins, implementations, or go-lives
";

/// Firmographic payload with its competitor list cut to the top entries by similarity
/// and its update list cut to the most recent items, descriptions budgeted.
pub fn condense_firmographic(result: &ProviderResult) -> Value {
    let mut payload = result.raw.clone();
    let Some(object) = payload.as_object_mut() else {
        return payload;
    };

    if object.get("competitors").map_or(false, Value::is_array) {
        let top = top_competitors(&result.view.competitors, MAX_COMPETITORS)
            .into_iter()
            .map(|c| c.raw.clone())
            .collect();
        object.insert("competitors".into(), Value::Array(top));
    }

    if let Some(items) = result.raw["company_updates"].as_array() {
        let raw_updates: Vec<&Value> = items.iter().filter(|v| v.is_object()).collect();
        let recent = recent_update_indices(&result.view.updates, MAX_NEWS_ITEMS)
            .into_iter()
            .filter_map(|i| raw_updates.get(i).map(|v| condensed_update(v)))
            .collect();
        object.insert("company_updates".into(), Value::Array(recent));
    }

    payload
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Prompt for the three-source report.
pub fn multi_source_prompt(
    company_name: &str,
    enrichment: &ProviderResult,
    firmographic: &ProviderResult,
    customers: &[SearchResult],
) -> String {
    let news = format_news_section(&recent_updates(&firmographic.view.updates, MAX_NEWS_ITEMS));
    let customers_json = serde_json::to_value(customers).unwrap_or(Value::Array(Vec::new()));

    format!(
        "Generate a structured, human-readable markdown report for the company: {company_name} \
using the following data fields and data sources in json format.\n\n\
## Data fields:\n{REPORT_SECTIONS}\n\
## Recent News:\n{news}\
## Data Sources:\n\
CoreSignal API: {coresignal}\n\
Apollo API: {apollo}\n\n\
## Major/Enterprise Customers (from Tavily)\n\
Data: {customers}\n\
---\n\n{INSTRUCTIONS}",
        coresignal = pretty(&condense_firmographic(firmographic)),
        apollo = pretty(&enrichment.raw),
        customers = pretty(&customers_json),
    )
}

/// Prompt for the firmographic-only report.
pub fn firmographic_prompt(website: &str, firmographic: &ProviderResult) -> String {
    let news = format_news_section(&recent_updates(&firmographic.view.updates, MAX_NEWS_ITEMS));

    format!(
        "Generate a structured, human-readable markdown report for the company: {website} \
using the following data fields.\n\n\
## Data fields:\n{REPORT_SECTIONS}\n\
## Recent News:\n{news}\
## Data Sources:\n\
CoreSignal API: {coresignal}\n\
---\n\n{INSTRUCTIONS}{CUSTOMER_INFERENCE}",
        coresignal = pretty(&condense_firmographic(firmographic)),
    )
}
