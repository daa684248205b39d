use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DashboardError, DashboardResult};
use crate::model::ModelId;

/// One daily OHLCV bar as served by the market endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcPoint {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, deserialize_with = "deserialize_volume")]
    pub volume: u64,
}

impl OhlcPoint {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

// Accepts "2024-01-10" as well as "2024-01-10T00:00:00".
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let day = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

fn deserialize_volume<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v as u64)
        .unwrap_or(0))
}

/// Chronologically ordered bars for one ticker.
///
/// Dates are strictly increasing; construction rejects anything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<OhlcPoint>", into = "Vec<OhlcPoint>")]
pub struct HistoricalSeries {
    points: Vec<OhlcPoint>,
}

impl HistoricalSeries {
    pub fn new(points: Vec<OhlcPoint>) -> DashboardResult<Self> {
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(DashboardError::InvalidResponse(format!(
                "history is not in increasing date order ({} followed by {})",
                pair[0].date, pair[1].date
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[OhlcPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&OhlcPoint> {
        self.points.last()
    }

    /// The bar before the latest one.
    pub fn previous(&self) -> Option<&OhlcPoint> {
        self.points.len().checked_sub(2).map(|i| &self.points[i])
    }

    pub fn last_close(&self) -> Option<f64> {
        self.last().map(|p| p.close)
    }

    /// The most recent `window` bars (all of them if the series is shorter).
    pub fn tail(&self, window: usize) -> &[OhlcPoint] {
        let start = self.points.len().saturating_sub(window);
        &self.points[start..]
    }

    pub fn require_points(&self, min: usize) -> DashboardResult<()> {
        if self.points.len() < min {
            return Err(DashboardError::InsufficientData(format!(
                "need at least {} historical points, got {}",
                min,
                self.points.len()
            )));
        }
        Ok(())
    }
}

impl TryFrom<Vec<OhlcPoint>> for HistoricalSeries {
    type Error = DashboardError;

    fn try_from(points: Vec<OhlcPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<HistoricalSeries> for Vec<OhlcPoint> {
    fn from(series: HistoricalSeries) -> Self {
        series.points
    }
}

/// Descriptive metadata plus history for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerProfile {
    pub ticker: String,
    pub name: String,
    pub exchange: String,
    pub currency: String,
    pub data: HistoricalSeries,
}

/// Successful forecast: one price per future day, offset 1..=n from the
/// last historical date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub model: ModelId,
    pub forecast: Vec<f64>,
}

impl ForecastResult {
    pub fn new(model: ModelId, forecast: Vec<f64>) -> Self {
        Self { model, forecast }
    }

    /// Price on the target date.
    pub fn final_price(&self) -> Option<f64> {
        self.forecast.last().copied()
    }
}

/// A model whose forecast request did not succeed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastError {
    pub model: ModelId,
    pub error: String,
}

impl ForecastError {
    pub fn new(model: ModelId, error: impl Into<String>) -> Self {
        Self {
            model,
            error: error.into(),
        }
    }

    pub fn from_error(model: ModelId, err: &DashboardError) -> Self {
        Self::new(model, err.user_message())
    }
}

/// Settled result of one per-model request.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    Success(ForecastResult),
    Failure(ForecastError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Every model produced a forecast.
    Complete,
    /// Some models failed, at least one succeeded.
    Partial,
    /// No model produced a forecast.
    TotalFailure,
}

/// Successes and failures of one aggregation round, in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedOutcome {
    pub successes: Vec<ForecastResult>,
    pub failures: Vec<ForecastError>,
}

impl AggregatedOutcome {
    /// Partition settled outcomes in a single pass, keeping their order.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = ModelOutcome>) -> Self {
        let mut aggregated = Self::default();
        for outcome in outcomes {
            match outcome {
                ModelOutcome::Success(r) => aggregated.successes.push(r),
                ModelOutcome::Failure(e) => aggregated.failures.push(e),
            }
        }
        aggregated
    }

    /// Number of records across both partitions.
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn status(&self) -> OutcomeStatus {
        if self.successes.is_empty() {
            OutcomeStatus::TotalFailure
        } else if self.failures.is_empty() {
            OutcomeStatus::Complete
        } else {
            OutcomeStatus::Partial
        }
    }

    /// Blocking message listing every failed model.
    pub fn failure_report(&self) -> String {
        let mut report = String::from("All models failed.");
        for failure in &self.failures {
            report.push('\n');
            report.push_str(&format!("{}: {}", failure.model, failure.error));
        }
        report
    }
}
