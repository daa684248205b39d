use anyhow::{bail, Result};
use chart_renderer::{
    summarize, ChartPeriod, ChartSlot, ForecastChart, JsonFileSurface, MarketChart,
    MarketChartStyle, QuoteHeader,
};
use chrono::Local;
use dashboard_core::{ModelId, OutcomeStatus};
use forecast_aggregator::{ForecastAggregator, ForecastRequest};
use forecast_client::BackendClients;
use market_client::MarketClient;
use std::sync::Arc;

use crate::args::Target;
use crate::config::AppConfig;
use crate::session::SessionStore;

pub const FORECAST_CHART_FILE: &str = "forecast_chart.json";
pub const MARKET_CHART_FILE: &str = "market_chart.json";

pub struct App {
    config: AppConfig,
    session: SessionStore,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let session = SessionStore::new(&config.session_dir);
        Self { config, session }
    }

    fn market_client(&self) -> Result<MarketClient> {
        Ok(MarketClient::new(
            self.config.endpoints.market_url.clone(),
            self.config.endpoints.http_timeout,
        )?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let clients = BackendClients::new(&self.config.endpoints)?;
        let user = clients.auth.login(username, password).await?;
        self.session.save(&user)?;
        tracing::info!("Session stored at {}", self.session.path().display());
        println!("Logged in as {}", user);
        Ok(())
    }

    pub async fn signup(&self, username: &str, password: &str) -> Result<()> {
        let clients = BackendClients::new(&self.config.endpoints)?;
        clients.auth.signup(username, password).await?;
        println!("Account created successfully! Please sign in.");
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        println!("Logged out");
        Ok(())
    }

    pub async fn quote(
        &self,
        ticker: &str,
        period: ChartPeriod,
        style: MarketChartStyle,
    ) -> Result<()> {
        let user = self.session.require()?;
        tracing::debug!("quote {} for {}", ticker, user);

        let profile = self.market_client()?.get_ticker(ticker).await?;
        let header = QuoteHeader::from_profile(&profile)?;
        println!("{}", header);

        let mut surface = JsonFileSurface::new(self.config.output_dir.join(MARKET_CHART_FILE));
        let handle = MarketChart::new(period, style).render(&mut surface, &profile.data)?;
        tracing::info!(
            "Market chart {:?} ({} points) written to {}",
            handle.id(),
            handle.spec().point_count(),
            surface.path().display()
        );
        Ok(())
    }

    pub async fn forecast(&self, ticker: &str, target: &Target, models: Vec<ModelId>) -> Result<()> {
        let user = self.session.require()?;
        let today = Local::now().date_naive();
        let request = ForecastRequest::new(ticker, target.resolve(today)?, models);
        tracing::info!(
            "{} requested {} forecast to {} with {} models",
            user,
            request.ticker,
            request.target_date,
            request.models.len()
        );

        let clients = BackendClients::new(&self.config.endpoints)?;
        let aggregator =
            ForecastAggregator::new(Arc::new(self.market_client()?), Arc::new(clients.forecasts));

        println!("Running forecast... models may take a while to train.");
        let round = aggregator.run_round_on(&request, today).await?;

        println!("{}", QuoteHeader::from_profile(&round.profile)?);
        println!();

        let mut surface = JsonFileSurface::new(self.config.output_dir.join(FORECAST_CHART_FILE));
        let mut slot = ChartSlot::new();
        let chart = ForecastChart::with_window(self.config.chart_window);
        slot.show(
            &mut surface,
            chart.build(&round.profile.data, &round.outcome.successes)?,
        )?;
        tracing::info!("Forecast chart written to {}", surface.path().display());

        println!("Forecast for {} ({} days)", request.target_date, round.horizon_days);
        for card in summarize(&round.outcome, round.last_close)? {
            println!("  {}", card);
        }

        match round.status() {
            OutcomeStatus::TotalFailure => bail!("{}", round.outcome.failure_report()),
            OutcomeStatus::Partial => {
                tracing::warn!("{} of {} models failed", round.outcome.failures.len(), round.outcome.len());
                Ok(())
            }
            OutcomeStatus::Complete => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::NaiveDate;
    use forecast_client::EndpointConfig;
    use serde_json::{json, Value};

    async fn market(Path(ticker): Path<String>) -> Response {
        if ticker != "AAPL" {
            return (StatusCode::NOT_FOUND, Json(json!({"detail": "No data found"}))).into_response();
        }
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let data: Vec<Value> = (0..120u64)
            .map(|i| {
                let date = start + chrono::Days::new(i);
                let close = 150.0 + i as f64;
                json!({"date": date.to_string(), "open": close, "high": close, "low": close, "close": close, "volume": 1000})
            })
            .collect();
        Json(json!({"ticker": "AAPL", "name": "Apple Inc.", "exchange": "NASDAQ", "currency": "USD", "data": data}))
            .into_response()
    }

    async fn predict(Path((model, _ticker)): Path<(String, String)>) -> Response {
        match model.as_str() {
            "arima" => Json(json!({"model": "arima", "forecast": [271.0, 272.5]})).into_response(),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Model execution failed"})),
            )
                .into_response(),
        }
    }

    async fn app(dir: &std::path::Path) -> App {
        let router = Router::new()
            .route("/api/market/:ticker", get(market))
            .route("/api/predict/:model/:ticker", get(predict));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let app = App::new(AppConfig {
            endpoints: EndpointConfig::from_api_url(&format!("http://{}/api", addr)),
            chart_window: 90,
            output_dir: dir.join("out"),
            session_dir: dir.join("session"),
        });
        app.session.save("alice").unwrap();
        app
    }

    #[tokio::test]
    async fn test_forecast_writes_chart() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;

        app.forecast("aapl", &Target::DaysAhead(2), vec![ModelId::Arima, ModelId::Lstm])
            .await
            .unwrap();

        let chart: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("out").join(FORECAST_CHART_FILE)).unwrap(),
        )
        .unwrap();
        let series = chart["series"].as_array().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0]["data"].as_array().unwrap().len(), 90);
        assert_eq!(series[1]["name"], "ARIMA");
        assert_eq!(series[1]["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_total_failure_still_charts_history() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;

        let err = app
            .forecast("AAPL", &Target::DaysAhead(2), vec![ModelId::Lstm, ModelId::Tft])
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("All models failed."));
        assert!(err.to_string().contains("lstm: Model execution failed"));
        assert!(dir.path().join("out").join(FORECAST_CHART_FILE).exists());
    }

    #[tokio::test]
    async fn test_unknown_ticker_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;

        let err = app
            .forecast("ZZZZ", &Target::DaysAhead(2), vec![ModelId::Arima])
            .await
            .unwrap_err();
        let dashboard = err.downcast_ref::<dashboard_core::DashboardError>().unwrap();
        assert!(dashboard.is_not_found());
        assert!(!dir.path().join("out").join(FORECAST_CHART_FILE).exists());
    }

    #[tokio::test]
    async fn test_requires_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;
        app.logout().unwrap();

        let err = app
            .quote("AAPL", ChartPeriod::OneMonth, MarketChartStyle::Area)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<dashboard_core::DashboardError>(),
            Some(dashboard_core::DashboardError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_quote_writes_market_chart() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path()).await;

        app.quote("AAPL", ChartPeriod::OneMonth, MarketChartStyle::Candlestick)
            .await
            .unwrap();

        let chart: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("out").join(MARKET_CHART_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(chart["chart"]["type"], "candlestick");
        assert_eq!(chart["series"][0]["data"].as_array().unwrap().len(), 21);
        assert_eq!(chart["colors"][0], "#00C805");
    }
}
