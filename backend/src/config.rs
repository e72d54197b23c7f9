use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("{0}")]
    Validation(String),
}

#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    pub request_delay: Duration,
    /// Per-call timeout inside the ten-coin portfolio loop
    pub chart_timeout: Duration,
    /// Timeout for the single-asset route
    pub asset_chart_timeout: Duration,
    pub listing_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Where to ship logs besides stdout.
#[derive(Debug, Clone, PartialEq)]
pub struct LokiConfig {
    pub url: url::Url,
    pub service: String,
    pub environment: String,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `info,perfchart_backend=debug`
    pub filter: String,
    pub loki: Option<LokiConfig>,
}

impl LogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let loki_enabled: bool = env_or("LOKI_ENABLED", false)?;
        let loki = if loki_enabled {
            Some(loki_from(
                std::env::var("LOKI_URL").ok(),
                std::env::var("SERVICE_NAME").unwrap_or_else(|_| "perfchart".to_string()),
                std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            )?)
        } else {
            None
        };

        Ok(Self {
            filter: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            loki,
        })
    }
}

fn loki_from(url: Option<String>, service: String, environment: String) -> Result<LokiConfig, ConfigError> {
    let raw = url.ok_or_else(|| {
        ConfigError::Validation("LOKI_ENABLED is true but LOKI_URL is not set".into())
    })?;
    let url = url::Url::parse(&raw).map_err(|_| ConfigError::Invalid {
        key: "LOKI_URL",
        value: raw.clone(),
    })?;
    Ok(LokiConfig { url, service, environment })
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
    pub worker_pool_size: usize,
    pub coingecko: CoinGeckoConfig,
    pub yahoo: YahooConfig,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
}

/// Reads `key`, falling back to `default` when unset. A set but unparsable
/// value is an error rather than a silent default.
fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host: IpAddr = env_or("HOST", IpAddr::from([0, 0, 0, 0]))?;
        let port: u16 = env_or("PORT", 8001)?;

        let config = Self {
            logging: LogConfig::from_env()?,
            bind_addr: SocketAddr::new(host, port),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
            worker_pool_size: env_or("WORKER_POOL_SIZE", 4)?,
            coingecko: CoinGeckoConfig {
                base_url: std::env::var("COINGECKO_BASE_URL")
                    .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".to_string()),
                request_delay: Duration::from_millis(env_or("COINGECKO_REQUEST_DELAY_MS", 500)?),
                chart_timeout: Duration::from_secs(env_or("COINGECKO_TIMEOUT_SECS", 10)?),
                asset_chart_timeout: Duration::from_secs(env_or("COINGECKO_ASSET_TIMEOUT_SECS", 15)?),
                listing_timeout: Duration::from_secs(env_or("COINGECKO_LISTING_TIMEOUT_SECS", 15)?),
            },
            yahoo: YahooConfig {
                base_url: std::env::var("YAHOO_BASE_URL")
                    .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string()),
                timeout: Duration::from_secs(env_or("YAHOO_TIMEOUT_SECS", 15)?),
            },
            database_url: std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()),
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 5)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_pool_size == 0 {
            return Err(ConfigError::Validation("WORKER_POOL_SIZE must be at least 1".into()));
        }
        if self.coingecko.chart_timeout.is_zero()
            || self.coingecko.asset_chart_timeout.is_zero()
            || self.coingecko.listing_timeout.is_zero()
            || self.yahoo.timeout.is_zero()
        {
            return Err(ConfigError::Validation("upstream timeouts must be non-zero".into()));
        }
        if self.database_url.is_some() && self.database_max_connections == 0 {
            return Err(ConfigError::Validation("DATABASE_MAX_CONNECTIONS must be at least 1".into()));
        }
        for (key, value) in [
            ("COINGECKO_BASE_URL", &self.coingecko.base_url),
            ("YAHOO_BASE_URL", &self.yahoo.base_url),
        ] {
            url::Url::parse(value).map_err(|_| ConfigError::Invalid {
                key,
                value: value.clone(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            logging: LogConfig {
                filter: "info".to_string(),
                loki: None,
            },
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8001)),
            cors_origins: vec!["*".to_string()],
            worker_pool_size: 4,
            coingecko: CoinGeckoConfig {
                base_url: "https://api.coingecko.com/api/v3".to_string(),
                request_delay: Duration::from_millis(500),
                chart_timeout: Duration::from_secs(10),
                asset_chart_timeout: Duration::from_secs(15),
                listing_timeout: Duration::from_secs(15),
            },
            yahoo: YahooConfig {
                base_url: "https://query1.finance.yahoo.com".to_string(),
                timeout: Duration::from_secs(15),
            },
            database_url: None,
            database_max_connections: 5,
        }
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:3000, https://chart.example.com,"),
            vec!["http://localhost:3000", "https://chart.example.com"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let mut config = sample_config();
        config.worker_pool_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_zero_asset_timeout() {
        let mut config = sample_config();
        config.coingecko.asset_chart_timeout = Duration::ZERO;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = sample_config();
        config.yahoo.base_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "YAHOO_BASE_URL", .. })
        ));
    }

    #[test]
    fn test_loki_requires_valid_url() {
        let err = loki_from(None, "perfchart".into(), "test".into()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = loki_from(Some("not a url".into()), "perfchart".into(), "test".into()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "LOKI_URL", .. }));

        let loki = loki_from(Some("http://localhost:3100".into()), "perfchart".into(), "test".into()).unwrap();
        assert_eq!(loki.url.as_str(), "http://localhost:3100/");
        assert_eq!(loki.service, "perfchart");
    }
}
