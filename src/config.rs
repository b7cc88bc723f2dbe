use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CONSULT_BASE_URL: &str = "https://api.bluenext2.online";
pub const DEFAULT_CONSULT_TIMEOUT_MS: u64 = 25_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Bearer token sent to the consult API. Never logged.
    pub api_token: String,
    pub consult_base_url: String,
    pub consult_timeout_ms: u64,
}

impl Config {
    /// Loads configuration from the process environment (and `.env` if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// `API_TOKEN` is mandatory: without it the service refuses to start rather
    /// than calling the consult API with some built-in credential.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            port: lookup("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            api_token: lookup("API_TOKEN")
                .ok_or_else(|| anyhow::anyhow!("API_TOKEN environment variable required"))
                .and_then(|token| {
                    if token.trim().is_empty() {
                        anyhow::bail!("API_TOKEN cannot be empty");
                    }
                    Ok(token)
                })?,
            consult_base_url: lookup("CONSULT_API_BASE_URL")
                .filter(|s| !s.trim().is_empty())
                .map_or_else(|| Ok(DEFAULT_CONSULT_BASE_URL.to_string()), |url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("CONSULT_API_BASE_URL must start with http:// or https://");
                    }
                    Ok(url.trim_end_matches('/').to_string())
                })?,
            consult_timeout_ms: lookup("CONSULT_TIMEOUT_MS")
                .map_or(Ok(DEFAULT_CONSULT_TIMEOUT_MS), |raw| {
                    raw.parse::<u64>()
                        .ok()
                        .filter(|ms| *ms > 0)
                        .ok_or_else(|| {
                            anyhow::anyhow!("CONSULT_TIMEOUT_MS must be a positive number of milliseconds")
                        })
                })?,
        };

        tracing::debug!("Consult API base URL: {}", config.consult_base_url);
        tracing::debug!("Consult API timeout: {}ms", config.consult_timeout_ms);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    pub fn consult_timeout(&self) -> Duration {
        Duration::from_millis(self.consult_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_token_only() {
        let config = Config::from_lookup(lookup_from(&[("API_TOKEN", "secret")])).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.consult_base_url, DEFAULT_CONSULT_BASE_URL);
        assert_eq!(config.consult_timeout(), Duration::from_millis(25_000));
    }

    #[test]
    fn test_missing_token_fails_closed() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("API_TOKEN"));
    }

    #[test]
    fn test_blank_token_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("API_TOKEN", "   ")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_TOKEN", "secret"),
            ("PORT", "8080"),
            ("CONSULT_API_BASE_URL", "http://127.0.0.1:9999/"),
            ("CONSULT_TIMEOUT_MS", "500"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.consult_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.consult_timeout_ms, 500);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(
            Config::from_lookup(lookup_from(&[("API_TOKEN", "t"), ("PORT", "abc")])).is_err()
        );
        assert!(Config::from_lookup(lookup_from(&[
            ("API_TOKEN", "t"),
            ("CONSULT_API_BASE_URL", "ftp://example.com"),
        ]))
        .is_err());
        assert!(Config::from_lookup(lookup_from(&[
            ("API_TOKEN", "t"),
            ("CONSULT_TIMEOUT_MS", "0"),
        ]))
        .is_err());
    }
}
