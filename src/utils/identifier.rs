use regex::Regex;
use std::sync::OnceLock;

fn scheme_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^https?://").expect("static regex"))
}

/// Strip scheme, `www.` and trailing slashes: `https://www.example.com/` -> `example.com`.
pub fn normalize_domain(input: &str) -> String {
    let trimmed = input.trim();
    let without_scheme = scheme_re().replace(trimmed, "");
    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(&without_scheme);
    without_www.trim_end_matches('/').to_string()
}

/// Prefix a bare website with `https://`.
pub fn ensure_scheme(website: &str) -> String {
    let website = website.trim();
    if scheme_re().is_match(website) {
        website.to_string()
    } else {
        format!("https://{}", website)
    }
}

/// Deterministic file-name slug for an identifier: `https://www.example.com` -> `example_com`.
pub fn identifier_slug(identifier: &str) -> String {
    normalize_domain(identifier)
        .chars()
        .map(|c| match c {
            '.' | ' ' | '/' | '\\' | ':' => '_',
            other => other,
        })
        .collect()
}

/// Display name used when no provider supplies one: `example.com` -> `Example`.
pub fn display_name_from_identifier(identifier: &str) -> String {
    let domain = normalize_domain(identifier);
    let host = domain.split('/').next().unwrap_or_default();
    let stem = host.strip_suffix(".com").unwrap_or(host);
    let titled = title_case(stem);
    if titled.trim().is_empty() {
        "Unknown Company".to_string()
    } else {
        titled
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
