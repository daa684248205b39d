use dashboard_core::{AggregatedOutcome, DashboardError, DashboardResult, ModelId};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Zero change counts as up.
    pub fn of(change: f64) -> Self {
        if change >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Direction::Up => crate::market::UP_COLOR,
            Direction::Down => crate::market::DOWN_COLOR,
        }
    }
}

/// Per-model card under the forecast chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SummaryCard {
    Forecast {
        model: ModelId,
        color: &'static str,
        final_price: f64,
        change_pct: f64,
        direction: Direction,
    },
    Failed {
        model: ModelId,
        message: String,
    },
}

impl SummaryCard {
    pub fn model(&self) -> &ModelId {
        match self {
            SummaryCard::Forecast { model, .. } | SummaryCard::Failed { model, .. } => model,
        }
    }
}

impl fmt::Display for SummaryCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryCard::Forecast {
                model,
                final_price,
                change_pct,
                direction,
                ..
            } => write!(
                f,
                "{:<8} {:>10.2}  {} {:.2}%",
                model.label(),
                final_price,
                direction.arrow(),
                change_pct.abs()
            ),
            SummaryCard::Failed { model, message } => {
                write!(f, "{:<8} {:>10}  {}", model.label(), "FAILED", message)
            }
        }
    }
}

/// Success cards in success order, then failure cards in failure order.
///
/// Percent change is measured from `last_close` to the final forecast price.
pub fn summarize(outcome: &AggregatedOutcome, last_close: f64) -> DashboardResult<Vec<SummaryCard>> {
    if !last_close.is_finite() || last_close <= 0.0 {
        return Err(DashboardError::InvalidInput(format!(
            "last close must be a positive price, got {}",
            last_close
        )));
    }

    let successes = outcome.successes.iter().filter_map(|result| {
        let final_price = result.final_price()?;
        let change_pct = (final_price - last_close) / last_close * 100.0;
        Some(SummaryCard::Forecast {
            model: result.model.clone(),
            color: result.model.color(),
            final_price,
            change_pct,
            direction: Direction::of(change_pct),
        })
    });

    let failures = outcome.failures.iter().map(|failure| SummaryCard::Failed {
        model: failure.model.clone(),
        message: failure.error.clone(),
    });

    Ok(successes.chain(failures).collect())
}
