use async_trait::async_trait;

use crate::{DashboardResult, ForecastResult, ModelId, TickerProfile};

/// Source of ticker metadata and daily history
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn ticker_profile(&self, ticker: &str) -> DashboardResult<TickerProfile>;
}

/// Source of per-model price forecasts
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn forecast(
        &self,
        model: &ModelId,
        ticker: &str,
        days: u32,
    ) -> DashboardResult<ForecastResult>;
}
