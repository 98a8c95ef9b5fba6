//! Environment variable helpers

/// Read a variable, falling back to `default` when unset
///
/// # Example
/// ```rust
/// use cinnamon_core::utils::env_or_default;
///
/// let filter = env_or_default("CINNAMON_LOG", "info");
/// ```
pub fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read a variable as `Option`, treating blank values as unset
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Read a boolean flag
///
/// "true", "1", "yes" and "on" (any case) are true; anything else, or an
/// unset variable, is false.
pub fn env_bool(key: &str) -> bool {
    env_opt(key)
        .map(|value| matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(false)
}
