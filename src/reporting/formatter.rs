use std::cmp::Ordering;

use serde_json::Value;

use crate::models::{CompanyUpdate, Competitor};
use crate::utils::truncation::{truncate_chars, NEWS_DESCRIPTION_BUDGET};

pub const MAX_COMPETITORS: usize = 5;
pub const MAX_NEWS_ITEMS: usize = 3;

/// Highest similarity first. A missing score counts as zero; ties keep source order.
pub fn top_competitors(competitors: &[Competitor], limit: usize) -> Vec<&Competitor> {
    let mut ranked: Vec<&Competitor> = competitors.iter().collect();
    ranked.sort_by(|a, b| {
        let a = a.similarity_score.unwrap_or(0.0);
        let b = b.similarity_score.unwrap_or(0.0);
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

/// Newest first. Items without a parseable date sort after every dated item.
pub fn recent_updates(updates: &[CompanyUpdate], limit: usize) -> Vec<&CompanyUpdate> {
    recent_update_indices(updates, limit).into_iter().map(|i| &updates[i]).collect()
}

/// Positions of the `limit` most recent updates, in report order.
pub fn recent_update_indices(updates: &[CompanyUpdate], limit: usize) -> Vec<usize> {
    let stamps: Vec<_> = updates.iter().map(CompanyUpdate::timestamp).collect();
    let mut order: Vec<usize> = (0..updates.len()).collect();
    order.sort_by(|&a, &b| match (stamps[a], stamps[b]) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    order.truncate(limit);
    order
}

/// Copy of an update object with its description cut to the news budget.
pub fn condensed_update(raw: &Value) -> Value {
    let mut item = raw.clone();
    if let Some(description) = raw["description"].as_str() {
        item["description"] = Value::String(truncate_chars(description, NEWS_DESCRIPTION_BUDGET));
    }
    item
}

pub fn format_news_section(updates: &[&CompanyUpdate]) -> String {
    if updates.is_empty() {
        return "No recent news items found.\n\n".to_string();
    }

    let mut news = String::new();
    for (i, update) in updates.iter().enumerate() {
        news.push_str(&format!("### News Item {}\n", i + 1));
        news.push_str(&format!("**Date:** {}  \n", update.date.as_deref().unwrap_or("No Date")));
        let summary = update
            .description
            .as_deref()
            .map(|d| truncate_chars(d, NEWS_DESCRIPTION_BUDGET))
            .unwrap_or_else(|| "No description available".to_string());
        news.push_str(&format!("**Summary:** {}  \n", summary));
        if let Some(line) = engagement_line(update) {
            news.push_str(&line);
        }
        news.push_str("\n\n");
    }
    news
}

fn engagement_line(update: &CompanyUpdate) -> Option<String> {
    let reactions = update.reactions_count.filter(|n| *n > 0);
    let comments = update.comments_count.filter(|n| *n > 0);
    match (reactions, comments) {
        (Some(r), Some(c)) => Some(format!("**Engagement:** {} reactions, {} comments", r, c)),
        (Some(r), None) => Some(format!("**Engagement:** {} reactions", r)),
        (None, Some(c)) => Some(format!("**Engagement:** {} comments", c)),
        (None, None) => None,
    }
}
