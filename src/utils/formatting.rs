/// Local wall-clock time in RFC 3339, as stamped on response bodies.
pub fn iso_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Reduce a company name to a filename-safe stem: alphanumerics, space, `-` and `_`
/// survive, then spaces become underscores.
pub fn safe_file_stem(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .replace(' ', "_")
}
