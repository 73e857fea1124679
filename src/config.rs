use crate::error::ConfigError;
use reqwest::Url;
use std::env;
use std::time::Duration;
use tracing::debug;

pub const API_URL_ENV: &str = "HOME_PRICE_API_URL";
pub const TIMEOUT_ENV: &str = "HOME_PRICE_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_TIMEOUT_SECS: f64 = 86_400.0;

/// Where the estimation service lives and how long a request may take
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Load from `.env` and the process environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        Self::from_values(
            env::var(API_URL_ENV).ok().as_deref(),
            env::var(TIMEOUT_ENV).ok().as_deref(),
        )
    }

    pub fn from_values(api_url: Option<&str>, timeout_secs: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = api_url {
            config.api_base_url = parse_base_url(url)?;
        }
        if let Some(secs) = timeout_secs {
            config.request_timeout = parse_timeout(secs)?;
        }
        Ok(config)
    }

    /// Apply command line overrides on top of the loaded values
    pub fn with_overrides(
        mut self,
        api_url: Option<&str>,
        timeout_secs: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = api_url {
            self.api_base_url = parse_base_url(url)?;
        }
        if let Some(secs) = timeout_secs {
            self.request_timeout = parse_timeout(secs)?;
        }
        Ok(self)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|err| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs > 0.0 && secs <= MAX_TIMEOUT_SECS => Ok(Duration::from_secs_f64(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let config = Config::from_values(None, None).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let config = Config::from_values(Some("http://estimator.local:8080"), Some("3"))
            .unwrap()
            .with_overrides(None, Some("0.5"))
            .unwrap();

        assert_eq!(config.api_base_url.host_str(), Some("estimator.local"));
        assert_eq!(config.request_timeout, Duration::from_millis(500));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_values(Some("not a url"), None),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            Config::from_values(Some("ftp://example.com"), None),
            Err(ConfigError::InvalidUrl { .. })
        ));
        for bad in ["0", "-2", "ten", "", "inf", "1e30"] {
            assert!(matches!(
                Config::from_values(None, Some(bad)),
                Err(ConfigError::InvalidTimeout(_))
            ));
        }
    }
}
