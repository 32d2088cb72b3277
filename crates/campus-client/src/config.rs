use std::time::Duration;

use tracing::warn;

pub const API_URL_VAR: &str = "CAMPUS_API_URL";
pub const TIMEOUT_VAR: &str = "CAMPUS_API_TIMEOUT_SECS";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings handed to [`crate::ApiClient`] at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the injected settings from the process environment (after `.env`).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = resolve_base_url(lookup(API_URL_VAR).as_deref());
        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!("Ignoring invalid {}={:?}", TIMEOUT_VAR, raw);
                    DEFAULT_TIMEOUT
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        Self { base_url, timeout }
    }
}

/// Non-empty injected `apiUrl` wins; otherwise the relative root.
pub fn resolve_base_url(api_url: Option<&str>) -> String {
    match api_url {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injected_url_is_used() {
        assert_eq!(
            resolve_base_url(Some("https://api.example.edu/v1")),
            "https://api.example.edu/v1"
        );
    }

    #[test]
    fn missing_or_empty_url_falls_back_to_root() {
        assert_eq!(resolve_base_url(None), "/");
        assert_eq!(resolve_base_url(Some("")), "/");
    }

    #[test]
    fn lookup_reads_timeout() {
        let cfg = ApiConfig::from_lookup(|key| match key {
            API_URL_VAR => Some("http://localhost:5000".into()),
            TIMEOUT_VAR => Some("15".into()),
            _ => None,
        });
        assert_eq!(cfg.base_url, "http://localhost:5000");
        assert_eq!(cfg.timeout, Duration::from_secs(15));
    }

    #[test]
    fn bad_timeout_keeps_default() {
        let cfg = ApiConfig::from_lookup(|key| match key {
            TIMEOUT_VAR => Some("soon".into()),
            _ => None,
        });
        assert_eq!(cfg.base_url, "/");
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
    }
}
