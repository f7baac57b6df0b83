use tracing::debug;

/// Resolve a credential value. If the value starts with '$', treat it as an
/// environment variable reference and resolve from the environment.
pub fn resolve_credential(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        match std::env::var(var_name) {
            Ok(resolved) => {
                debug!(var = %var_name, "Resolved credential from environment");
                resolved
            }
            Err(_) => {
                debug!(var = %var_name, "Environment variable not set, treating credential as absent");
                String::new()
            }
        }
    } else {
        value.to_string()
    }
}

/// Redact sensitive values in a string. Replaces known credential patterns
/// with [REDACTED].
pub fn redact_credentials<S: AsRef<str>>(text: &str, secrets: &[S]) -> String {
    let mut result = text.to_string();
    for secret in secrets {
        let secret = secret.as_ref();
        if !secret.is_empty() && secret.len() >= 4 {
            result = result.replace(secret, "[REDACTED]");
        }
    }
    result
}
