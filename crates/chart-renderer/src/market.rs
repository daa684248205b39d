use dashboard_core::{DashboardError, DashboardResult, HistoricalSeries};
use std::str::FromStr;

use crate::chart::{ChartPoint, ChartSeries, ChartSpec, Curve, FillKind, SeriesKind};
use crate::surface::{ChartHandle, ChartSurface};

pub const UP_COLOR: &str = "#00C805";
pub const DOWN_COLOR: &str = "#FF5000";

/// Lookback selector on the market overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartPeriod {
    OneMonth,
    #[default]
    OneYear,
    FiveYears,
}

impl ChartPeriod {
    pub fn calendar_days(&self) -> usize {
        match self {
            ChartPeriod::OneMonth => 30,
            ChartPeriod::OneYear => 365,
            ChartPeriod::FiveYears => 365 * 5,
        }
    }

    /// Trading bars in the period: roughly 70% of calendar days, capped by
    /// what is available.
    pub fn visible_points(&self, available: usize) -> usize {
        (self.calendar_days() * 7 / 10).min(available)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartPeriod::OneMonth => "1M",
            ChartPeriod::OneYear => "1Y",
            ChartPeriod::FiveYears => "5Y",
        }
    }
}

impl FromStr for ChartPeriod {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1M" => Ok(ChartPeriod::OneMonth),
            "1Y" => Ok(ChartPeriod::OneYear),
            "5Y" => Ok(ChartPeriod::FiveYears),
            other => Err(DashboardError::InvalidInput(format!(
                "unknown period {:?} (expected 1M, 1Y or 5Y)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarketChartStyle {
    #[default]
    Area,
    Candlestick,
}

/// Single-series price chart for the market overview page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketChart {
    pub period: ChartPeriod,
    pub style: MarketChartStyle,
}

impl MarketChart {
    pub fn new(period: ChartPeriod, style: MarketChartStyle) -> Self {
        Self { period, style }
    }

    pub fn build(&self, history: &HistoricalSeries) -> DashboardResult<ChartSpec> {
        let visible = history.tail(self.period.visible_points(history.len()));
        let (first, last) = match (visible.first(), visible.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(DashboardError::InsufficientData(
                    "no historical data to chart".to_string(),
                ))
            }
        };

        let color = if last.close >= first.close {
            UP_COLOR
        } else {
            DOWN_COLOR
        };

        let (kind, stroke_width, fill) = match self.style {
            MarketChartStyle::Area => (SeriesKind::Area, 2, FillKind::Gradient),
            MarketChartStyle::Candlestick => (SeriesKind::Candlestick, 1, FillKind::Solid),
        };

        let data = visible
            .iter()
            .map(|p| match self.style {
                MarketChartStyle::Area => ChartPoint::close(p.date, p.close),
                MarketChartStyle::Candlestick => {
                    ChartPoint::ohlc(p.date, p.open, p.high, p.low, p.close)
                }
            })
            .collect();

        Ok(ChartSpec {
            chart_type: kind,
            curve: Curve::Straight,
            series: vec![ChartSeries {
                name: format!("Price ({})", self.period.label()),
                kind,
                data,
                color: color.to_string(),
                stroke_width,
                fill,
            }],
        })
    }

    pub fn render<S: ChartSurface + ?Sized>(
        &self,
        surface: &mut S,
        history: &HistoricalSeries,
    ) -> DashboardResult<ChartHandle> {
        let spec = self.build(history)?;
        ChartHandle::mount(surface, spec)
    }
}
