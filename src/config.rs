use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub image_base: String,
    pub bind: SocketAddr,
    pub site_origin: Option<String>,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `std::env`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = non_empty("TMDB_API_KEY")
            .ok_or_else(|| anyhow!("Missing required environment variable: TMDB_API_KEY"))?;
        let api_base = non_empty("TMDB_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let image_base = non_empty("TMDB_IMAGE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let bind_raw = non_empty("MOVIEFLIX_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_raw
            .parse()
            .with_context(|| format!("MOVIEFLIX_BIND is not a socket address: {}", bind_raw))?;
        let site_origin = non_empty("MOVIEFLIX_SITE_ORIGIN");
        let http_timeout = match non_empty("MOVIEFLIX_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse().with_context(|| {
                format!("MOVIEFLIX_HTTP_TIMEOUT_SECS is not a number: {}", raw)
            })?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        info!("Using TMDB API base {}", api_base);
        Ok(Self {
            api_key,
            api_base,
            image_base,
            bind,
            site_origin,
            http_timeout,
        })
    }

    /// Config with defaults everywhere except the key; handy for tests and probes.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            site_origin: None,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
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
    fn requires_api_key() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("TMDB_API_KEY"));

        let err = Config::from_lookup(lookup(&[("TMDB_API_KEY", "  ")])).unwrap_err();
        assert!(err.to_string().contains("TMDB_API_KEY"));
    }

    #[test]
    fn applies_defaults() {
        let cfg = Config::from_lookup(lookup(&[("TMDB_API_KEY", "k")])).unwrap();
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.image_base, DEFAULT_IMAGE_BASE);
        assert_eq!(cfg.bind.port(), 3000);
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
        assert!(cfg.site_origin.is_none());
    }

    #[test]
    fn strips_trailing_slash_and_parses_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("TMDB_API_KEY", "k"),
            ("TMDB_API_BASE_URL", "http://localhost:9000/3/"),
            ("MOVIEFLIX_BIND", "127.0.0.1:8081"),
            ("MOVIEFLIX_HTTP_TIMEOUT_SECS", "5"),
            ("MOVIEFLIX_SITE_ORIGIN", "https://movies.example"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_base, "http://localhost:9000/3");
        assert_eq!(cfg.bind.port(), 8081);
        assert_eq!(cfg.http_timeout, Duration::from_secs(5));
        assert_eq!(cfg.site_origin.as_deref(), Some("https://movies.example"));
    }

    #[test]
    fn rejects_bad_bind() {
        let err =
            Config::from_lookup(lookup(&[("TMDB_API_KEY", "k"), ("MOVIEFLIX_BIND", "nope")]))
                .unwrap_err();
        assert!(err.to_string().contains("MOVIEFLIX_BIND"));
    }
}
