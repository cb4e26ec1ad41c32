use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 240;

/// Runtime settings for the client.
///
/// Built from a key lookup so the browser build can feed it from
/// `option_env!` and native code from the process environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root without a trailing slash, e.g. `https://shop.example/api`.
    pub base_url: String,
    pub timeout: Duration,
    pub debug: bool,
    pub analytics: bool,
    /// How often a signed-in session proactively refreshes its token.
    pub refresh_interval: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base(base_url.into()),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            debug: false,
            analytics: false,
            refresh_interval: Duration::from_secs(
                DEFAULT_REFRESH_INTERVAL_SECS,
            ),
        }
    }

    /// Read `BACKEND_URL`, `API_TIMEOUT_MS`, `DEBUG`, `ANALYTICS` and
    /// `TOKEN_REFRESH_INTERVAL_SECS`. Missing keys take their defaults;
    /// unparseable ones are logged and also take their defaults.
    pub fn from_lookup<F>(default_base_url: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            lookup("BACKEND_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| default_base_url.to_string()),
        );

        if let Some(ms) = parse_key(&lookup, "API_TIMEOUT_MS", parse_positive)
        {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(secs) =
            parse_key(&lookup, "TOKEN_REFRESH_INTERVAL_SECS", parse_positive)
        {
            config.refresh_interval = Duration::from_secs(secs);
        }
        config.debug = parse_key(&lookup, "DEBUG", parse_flag).unwrap_or(false);
        config.analytics =
            parse_key(&lookup, "ANALYTICS", parse_flag).unwrap_or(false);
        config
    }
}

fn parse_key<F, T>(
    lookup: &F,
    key: &str,
    parse: fn(&str) -> Option<T>,
) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        tracing::warn!("ignoring invalid {key}={raw:?}");
    }
    parsed
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.parse().ok().filter(|n| *n > 0)
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config =
            ClientConfig::from_lookup("http://localhost:8000/api", lookup(&[]));
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.timeout, Duration::from_millis(15_000));
        assert_eq!(config.refresh_interval, Duration::from_secs(240));
        assert!(!config.debug);
        assert!(!config.analytics);
    }

    #[test]
    fn overrides() {
        let config = ClientConfig::from_lookup(
            "/api",
            lookup(&[
                ("BACKEND_URL", "https://shop.example/api/"),
                ("API_TIMEOUT_MS", "5000"),
                ("DEBUG", "true"),
                ("ANALYTICS", "1"),
                ("TOKEN_REFRESH_INTERVAL_SECS", "60"),
            ]),
        );
        assert_eq!(config.base_url, "https://shop.example/api");
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert!(config.debug);
        assert!(config.analytics);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(
            "/api",
            lookup(&[
                ("BACKEND_URL", "  "),
                ("API_TIMEOUT_MS", "soon"),
                ("DEBUG", "maybe"),
                ("TOKEN_REFRESH_INTERVAL_SECS", "0"),
            ]),
        );
        assert_eq!(config.base_url, "/api");
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(
            config.refresh_interval,
            Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS)
        );
        assert!(!config.debug);
    }
}
