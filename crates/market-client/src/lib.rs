use async_trait::async_trait;
use dashboard_core::http::{join_url, read_error_detail};
use dashboard_core::{
    DashboardError, DashboardResult, HistoricalSeries, MarketDataSource, TickerProfile,
};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_MARKET_URL: &str = "http://127.0.0.1:8000/api/market";

/// Client for the market-data endpoint: `GET {base}/{ticker}`.
#[derive(Clone)]
pub struct MarketClient {
    client: Client,
    base_url: String,
}

impl MarketClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DashboardResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch name, exchange, currency and daily history for a ticker.
    ///
    /// Any non-2xx status means the ticker was not found.
    pub async fn get_ticker(&self, ticker: &str) -> DashboardResult<TickerProfile> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(DashboardError::InvalidInput("ticker is empty".to_string()));
        }

        let url = join_url(&self.base_url, &[ticker]);
        tracing::debug!("Fetching market data for {} from {}", ticker, url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = read_error_detail(response)
                .await
                .unwrap_or_else(|| format!("No data found for {}", ticker));
            tracing::warn!("Market data for {} unavailable: HTTP {} {}", ticker, status, detail);
            return Err(DashboardError::Http { status, detail });
        }

        let body: TickerResponse = response.json().await?;
        let profile = body.into_profile(ticker);
        tracing::debug!("Loaded {} bars for {}", profile.data.len(), profile.ticker);
        Ok(profile)
    }
}

#[async_trait]
impl MarketDataSource for MarketClient {
    async fn ticker_profile(&self, ticker: &str) -> DashboardResult<TickerProfile> {
        self.get_ticker(ticker).await
    }
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    ticker: Option<String>,
    name: Option<String>,
    exchange: Option<String>,
    currency: Option<String>,
    #[serde(default)]
    data: HistoricalSeries,
}

impl TickerResponse {
    fn into_profile(self, requested: &str) -> TickerProfile {
        let ticker = non_empty(self.ticker).unwrap_or_else(|| requested.to_uppercase());
        TickerProfile {
            name: non_empty(self.name).unwrap_or_else(|| ticker.clone()),
            exchange: non_empty(self.exchange).unwrap_or_else(|| "MARKET".to_string()),
            currency: non_empty(self.currency).unwrap_or_else(|| "USD".to_string()),
            ticker,
            data: self.data,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/market", addr)
    }

    async fn market(Path(ticker): Path<String>) -> impl IntoResponse {
        match ticker.as_str() {
            "INFY.NS" => (
                StatusCode::OK,
                Json(json!({
                    "ticker": "INFY.NS",
                    "name": "Infosys Limited",
                    "exchange": "NSE",
                    "currency": "INR",
                    "data": [
                        {"date": "2024-01-09", "open": 1500.0, "high": 1520.0, "low": 1490.0, "close": 1510.0, "volume": 1000},
                        {"date": "2024-01-10", "open": 1510.0, "high": 1530.0, "low": 1505.0, "close": 1525.5, "volume": 1200}
                    ]
                })),
            ),
            "BARE" => (
                StatusCode::OK,
                Json(json!({ "data": [
                    {"date": "2024-01-10", "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0, "volume": 1}
                ]})),
            ),
            "BROKEN" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "yfinance exploded"}))),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": format!("No data found for {}", ticker)})),
            ),
        }
    }

    async fn client() -> MarketClient {
        let base = serve(Router::new().route("/api/market/:ticker", get(market))).await;
        MarketClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_ticker() {
        let client = client().await;
        let profile = client.get_ticker("INFY.NS").await.unwrap();

        assert_eq!(profile.name, "Infosys Limited");
        assert_eq!(profile.exchange, "NSE");
        assert_eq!(profile.currency, "INR");
        assert_eq!(profile.data.len(), 2);
        assert_eq!(profile.data.last_close(), Some(1525.5));
    }

    #[tokio::test]
    async fn test_metadata_fallbacks() {
        let client = client().await;
        let profile = client.get_ticker("BARE").await.unwrap();

        assert_eq!(profile.ticker, "BARE");
        assert_eq!(profile.name, "BARE");
        assert_eq!(profile.exchange, "MARKET");
        assert_eq!(profile.currency, "USD");
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_not_found() {
        let client = client().await;
        let err = client.get_ticker("ZZZZ").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "No data found for ZZZZ");
    }

    #[tokio::test]
    async fn test_server_error_detail() {
        let client = client().await;
        let err = client.get_ticker("BROKEN").await.unwrap_err();

        assert!(matches!(err, DashboardError::Http { status: 500, .. }));
        assert_eq!(err.user_message(), "yfinance exploded");
    }

    #[tokio::test]
    async fn test_empty_ticker_rejected() {
        let client = MarketClient::new(DEFAULT_MARKET_URL, Duration::from_secs(1)).unwrap();
        let err = client.get_ticker("   ").await.unwrap_err();
        assert!(matches!(err, DashboardError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = format!("http://{}/api/market", addr);
        let client = MarketClient::new(base, Duration::from_secs(2)).unwrap();
        let err = client.get_ticker("AAPL").await.unwrap_err();
        assert!(matches!(err, DashboardError::Network(_)));
    }
}
