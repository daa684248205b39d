use async_trait::async_trait;
use dashboard_core::http::{detail_from_value, join_url};
use dashboard_core::{DashboardError, DashboardResult, ForecastResult, ForecastSource, ModelId};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    forecast: Vec<f64>,
}

/// Client for `GET {base}/{model}/{ticker}?days={n}`.
#[derive(Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

impl ForecastClient {
    pub fn new(base_url: String, timeout: Duration) -> DashboardResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forecast `days` daily closes for `ticker` with one model.
    ///
    /// A 2xx response without any prices counts as a failure. A body that
    /// is not JSON at all, whatever the status, is reported as a network error.
    pub async fn predict(
        &self,
        model: &ModelId,
        ticker: &str,
        days: u32,
    ) -> DashboardResult<ForecastResult> {
        let url = join_url(&self.base_url, &[model.as_str(), ticker]);
        tracing::debug!("Requesting {} forecast for {} ({} days)", model, ticker, days);

        let response = self
            .client
            .get(&url)
            .query(&[("days", days)])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let payload: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            DashboardError::Network(format!("unreadable {} response from {}: {}", status, url, e))
        })?;

        if !status.is_success() {
            let detail = detail_from_value(&payload).unwrap_or_else(|| "Unknown error".to_string());
            return Err(DashboardError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        let body: ForecastResponse = serde_json::from_value(payload)?;
        if body.forecast.is_empty() {
            return Err(DashboardError::InvalidResponse(format!(
                "{} returned no predictions.",
                model
            )));
        }

        Ok(ForecastResult::new(model.clone(), body.forecast))
    }
}

#[async_trait]
impl ForecastSource for ForecastClient {
    async fn forecast(
        &self,
        model: &ModelId,
        ticker: &str,
        days: u32,
    ) -> DashboardResult<ForecastResult> {
        self.predict(model, ticker, days).await
    }
}
