use chrono::{Local, NaiveDate};
use dashboard_core::{
    AggregatedOutcome, DashboardError, DashboardResult, ForecastError, ForecastSource,
    MarketDataSource, ModelId, ModelOutcome, OutcomeStatus, TickerProfile,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of whole calendar days from `today` to `target`.
///
/// Fails unless the target lies at least one day in the future.
pub fn horizon_days(today: NaiveDate, target: NaiveDate) -> DashboardResult<u32> {
    let days = (target - today).num_days();
    if days < 1 {
        return Err(DashboardError::InvalidInput(format!(
            "target date {} must be after {}",
            target, today
        )));
    }
    u32::try_from(days)
        .map_err(|_| DashboardError::InvalidInput(format!("horizon of {} days is too long", days)))
}

/// Collapse repeated selections, keeping first-seen order.
pub fn unique_models(models: &[ModelId]) -> Vec<ModelId> {
    let mut unique: Vec<ModelId> = Vec::with_capacity(models.len());
    for model in models {
        if !unique.contains(model) {
            unique.push(model.clone());
        }
    }
    unique
}

fn normalize_ticker(ticker: &str) -> DashboardResult<String> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(DashboardError::InvalidInput(
            "Please enter a valid ticker and a future date.".to_string(),
        ));
    }
    Ok(ticker.to_uppercase())
}

/// What the user asked for on the forecast page.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub ticker: String,
    pub target_date: NaiveDate,
    pub models: Vec<ModelId>,
}

impl ForecastRequest {
    pub fn new(ticker: impl Into<String>, target_date: NaiveDate, models: Vec<ModelId>) -> Self {
        Self {
            ticker: ticker.into(),
            target_date,
            models,
        }
    }
}

/// Everything one forecast round produced.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastRound {
    pub profile: TickerProfile,
    pub horizon_days: u32,
    /// Close of the most recent historical bar; baseline for percent changes.
    pub last_close: f64,
    pub outcome: AggregatedOutcome,
}

impl ForecastRound {
    pub fn status(&self) -> OutcomeStatus {
        self.outcome.status()
    }
}

/// Fans forecast requests out over the selected models and gathers them.
pub struct ForecastAggregator {
    market: Arc<dyn MarketDataSource>,
    forecasts: Arc<dyn ForecastSource>,
}

impl ForecastAggregator {
    pub fn new(market: Arc<dyn MarketDataSource>, forecasts: Arc<dyn ForecastSource>) -> Self {
        Self { market, forecasts }
    }

    /// Request every model concurrently and wait for all of them to settle.
    ///
    /// Per-model failures are recorded, never returned: only invalid input
    /// makes this fail.
    pub async fn aggregate(
        &self,
        ticker: &str,
        models: &[ModelId],
        days: u32,
    ) -> DashboardResult<AggregatedOutcome> {
        let models = unique_models(models);
        if models.is_empty() {
            return Err(DashboardError::InvalidInput(
                "Select at least one model.".to_string(),
            ));
        }
        if days < 1 {
            return Err(DashboardError::InvalidInput(
                "forecast horizon must be at least one day".to_string(),
            ));
        }

        let futures: Vec<_> = models
            .iter()
            .map(|model| {
                let source = &self.forecasts;
                async move {
                    debug!("Requesting {} forecast for {}", model, ticker);
                    match source.forecast(model, ticker, days).await {
                        Ok(result) if result.forecast.is_empty() => {
                            warn!("{} returned no predictions for {}", model, ticker);
                            ModelOutcome::Failure(ForecastError::new(
                                model.clone(),
                                format!("{} returned no predictions.", model),
                            ))
                        }
                        Ok(mut result) => {
                            result.model = model.clone();
                            ModelOutcome::Success(result)
                        }
                        Err(e) => {
                            warn!("{} forecast for {} failed: {}", model, ticker, e);
                            ModelOutcome::Failure(ForecastError::from_error(model.clone(), &e))
                        }
                    }
                }
            })
            .collect();

        let outcomes = futures::future::join_all(futures).await;
        Ok(AggregatedOutcome::from_outcomes(outcomes))
    }

    /// Run a full round using the local calendar date as "today".
    pub async fn run_round(&self, request: &ForecastRequest) -> DashboardResult<ForecastRound> {
        self.run_round_on(request, Local::now().date_naive()).await
    }

    /// Validate the request, load history, then aggregate forecasts.
    ///
    /// A history failure aborts the round; there is no chart without a baseline.
    pub async fn run_round_on(
        &self,
        request: &ForecastRequest,
        today: NaiveDate,
    ) -> DashboardResult<ForecastRound> {
        let ticker = normalize_ticker(&request.ticker)?;
        let horizon = horizon_days(today, request.target_date)?;
        let models = unique_models(&request.models);
        if models.is_empty() {
            return Err(DashboardError::InvalidInput(
                "Select at least one model.".to_string(),
            ));
        }

        let profile = self.market.ticker_profile(&ticker).await?;
        profile.data.require_points(2)?;
        let last_close = profile.data.last_close().ok_or_else(|| {
            DashboardError::InsufficientData(format!("no history for {}", ticker))
        })?;

        let outcome = self.aggregate(&ticker, &models, horizon).await?;
        info!(
            "Forecast round for {}: {} days, {} succeeded, {} failed",
            ticker,
            horizon,
            outcome.successes.len(),
            outcome.failures.len()
        );

        Ok(ForecastRound {
            profile,
            horizon_days: horizon,
            last_close,
            outcome,
        })
    }
}
