pub mod auth;
pub mod predictor;

pub use auth::AuthClient;
pub use predictor::ForecastClient;

use dashboard_core::DashboardResult;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Backend endpoints and request timeouts.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointConfig {
    pub market_url: String,
    pub predict_url: String,
    pub auth_url: String,
    /// Timeout for market and auth requests.
    pub http_timeout: Duration,
    /// Timeout for a single model forecast. Models train on demand, so this is
    /// much longer than `http_timeout`.
    pub forecast_timeout: Duration,
}

impl EndpointConfig {
    /// Derive every endpoint from one API root, e.g. `http://host:8000/api`.
    pub fn from_api_url(api_url: &str) -> Self {
        let api = api_url.trim_end_matches('/');
        Self {
            market_url: format!("{}/market", api),
            predict_url: format!("{}/predict", api),
            auth_url: format!("{}/auth", api),
            http_timeout: Duration::from_secs(30),
            forecast_timeout: Duration::from_secs(120),
        }
    }

    /// Read overrides through `get`, falling back to `DEFAULT_API_URL`.
    pub fn from_vars<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = get("STOCKDASH_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base = Self::from_api_url(&api_url);
        let secs = |key: &str| {
            get(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
        };

        Self {
            market_url: get("STOCKDASH_MARKET_URL").unwrap_or(base.market_url),
            predict_url: get("STOCKDASH_PREDICT_URL").unwrap_or(base.predict_url),
            auth_url: get("STOCKDASH_AUTH_URL").unwrap_or(base.auth_url),
            http_timeout: secs("STOCKDASH_HTTP_TIMEOUT_SECS").unwrap_or(base.http_timeout),
            forecast_timeout: secs("STOCKDASH_FORECAST_TIMEOUT_SECS")
                .unwrap_or(base.forecast_timeout),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }
}

/// Prediction and auth clients built from one configuration
#[derive(Clone)]
pub struct BackendClients {
    pub forecasts: ForecastClient,
    pub auth: AuthClient,
}

impl BackendClients {
    pub fn new(config: &EndpointConfig) -> DashboardResult<Self> {
        Ok(Self {
            forecasts: ForecastClient::new(config.predict_url.clone(), config.forecast_timeout)?,
            auth: AuthClient::new(config.auth_url.clone(), config.http_timeout)?,
        })
    }
}
