//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    parse_or_default(var, std::env::var(var).ok().as_deref(), default)
}

/// Parse a boolean flag. Accepts `1/0`, `true/false`, `yes/no`, `on/off`.
pub fn env_flag(var: &str, default: bool) -> bool {
    parse_flag(var, std::env::var(var).ok().as_deref(), default)
}

/// Parse a comma-separated list, trimming entries and dropping empty ones.
///
/// An unset or blank variable yields `default`.
pub fn env_list_with_default(var: &str, default: &[&str]) -> Vec<String> {
    parse_list(std::env::var(var).ok().as_deref(), default)
}

fn parse_or_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    raw: Option<&str>,
    default: T,
) -> T {
    match raw {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}

fn parse_flag(var: &str, raw: Option<&str>, default: bool) -> bool {
    let Some(v) = raw else {
        return default;
    };
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!(var, value = %v, default, "invalid boolean env var, using default");
            default
        },
    }
}

fn parse_list(raw: Option<&str>, default: &[&str]) -> Vec<String> {
    let items: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();
    if items.is_empty() { default.iter().map(|s| (*s).to_owned()).collect() } else { items }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_value() {
        let result: u32 = parse_or_default("X", Some("42"), 10);
        assert_eq!(result, 42);
    }

    #[test]
    fn test_parse_invalid_value() {
        let result: u32 = parse_or_default("X", Some("banana"), 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_parse_missing_value() {
        let result: u32 = parse_or_default("X", None, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_parse_empty_value() {
        let result: u32 = parse_or_default("X", Some(""), 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn test_env_parse_missing_var() {
        let result: u64 = env_parse_with_default("INVENTORY_CHAT_TEST_UNSET_88121", 7);
        assert_eq!(result, 7);
    }

    #[test]
    fn test_flag_variants() {
        assert!(parse_flag("X", Some("YES"), false));
        assert!(parse_flag("X", Some(" on "), false));
        assert!(!parse_flag("X", Some("0"), true));
        assert!(parse_flag("X", Some("maybe"), true));
        assert!(!parse_flag("X", None, false));
    }

    #[test]
    fn test_list_parsing() {
        assert_eq!(parse_list(Some("a, b,,c "), &["z"]), vec!["a", "b", "c"]);
        assert_eq!(parse_list(Some(" , "), &["z"]), vec!["z"]);
        assert_eq!(parse_list(None, &["x", "y"]), vec!["x", "y"]);
    }
}
