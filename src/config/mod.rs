//! Environment-driven configuration

use std::env;
use std::time::Duration;

pub const DEFAULT_BINANCE_API_URL: &str = "https://api.binance.com";
pub const DEFAULT_BITGET_API_URL: &str = "https://api.bitget.com";
pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com";

/// Deployment environment name (`ENVIRONMENT`, defaults to `sandbox`)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT")
        .map(|v| clean_value(&v))
        .unwrap_or_else(|_| "sandbox".to_string())
}

/// Base URLs of the upstream APIs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub binance_url: String,
    pub bitget_url: String,
    pub coingecko_url: String,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            binance_url: DEFAULT_BINANCE_API_URL.to_string(),
            bitget_url: DEFAULT_BITGET_API_URL.to_string(),
            coingecko_url: DEFAULT_COINGECKO_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Prefix all API routes are mounted under: empty or starting with `/`
    pub prefix_path: String,
    pub healthy_path: String,
    pub liveness_path: String,
    pub service_name: String,
    pub version: String,
    pub environment: String,
    pub upstream: UpstreamConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            prefix_path: "/v1".to_string(),
            healthy_path: "/healthy".to_string(),
            liveness_path: "/liveness".to_string(),
            service_name: "cryptometrics".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "sandbox".to_string(),
            upstream: UpstreamConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration using `lookup` as the variable source.
    ///
    /// Values may carry trailing `# comments`; unparsable numbers fall back
    /// to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| {
            lookup(name)
                .map(|v| clean_value(&v))
                .filter(|v| !v.is_empty())
        };

        let timeout = get("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.upstream.timeout);

        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            prefix_path: get("PREFIX_PATH")
                .map(|v| normalize_path(&v))
                .unwrap_or(defaults.prefix_path),
            healthy_path: get("HEALTHY_PATH")
                .map(|v| normalize_path(&v))
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.healthy_path),
            liveness_path: get("LIVENESS_PATH")
                .map(|v| normalize_path(&v))
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.liveness_path),
            service_name: get("DD_SERVICE").unwrap_or(defaults.service_name),
            version: get("DD_VERSION").unwrap_or(defaults.version),
            environment: get("ENVIRONMENT").unwrap_or(defaults.environment),
            upstream: UpstreamConfig {
                binance_url: get("BINANCE_API_URL").unwrap_or(defaults.upstream.binance_url),
                bitget_url: get("BITGET_API_URL").unwrap_or(defaults.upstream.bitget_url),
                coingecko_url: get("COINGECKO_API_URL").unwrap_or(defaults.upstream.coingecko_url),
                timeout,
            },
        }
    }

    /// Paths that are served but not logged
    pub fn quiet_paths(&self) -> Vec<String> {
        let prefix = self.prefix_path.trim_end_matches('/');
        vec![
            format!("{}/", prefix),
            format!("{}{}", prefix, self.healthy_path),
            format!("{}{}", prefix, self.liveness_path),
        ]
    }
}

/// Strip an inline `# comment` and surrounding whitespace
pub fn clean_value(value: &str) -> String {
    value.split('#').next().unwrap_or_default().trim().to_string()
}

/// Ensure a leading `/`; an empty or bare `/` prefix collapses to `""`
fn normalize_path(value: &str) -> String {
    let trimmed = value.trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
