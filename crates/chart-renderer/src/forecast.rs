use chrono::Days;
use dashboard_core::{DashboardError, DashboardResult, ForecastResult, HistoricalSeries, OhlcPoint};

use crate::chart::{ChartPoint, ChartSeries, ChartSpec, Curve, FillKind, SeriesKind};
use crate::surface::{ChartHandle, ChartSurface};

/// Historical bars shown next to a forecast.
pub const FORECAST_CONTEXT_DAYS: usize = 90;

const HISTORY_SERIES: &str = "Historical";
const HISTORY_COLOR: &str = "#000";

/// Historical closes plus one anchored line per successful model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastChart {
    window: usize,
}

impl Default for ForecastChart {
    fn default() -> Self {
        Self {
            window: FORECAST_CONTEXT_DAYS,
        }
    }
}

impl ForecastChart {
    pub fn with_window(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn build(
        &self,
        history: &HistoricalSeries,
        successes: &[ForecastResult],
    ) -> DashboardResult<ChartSpec> {
        let recent = history.tail(self.window);
        let anchor = recent.last().ok_or_else(|| {
            DashboardError::InsufficientData("no historical data to chart".to_string())
        })?;

        let mut series = Vec::with_capacity(successes.len() + 1);
        series.push(ChartSeries {
            name: HISTORY_SERIES.to_string(),
            kind: SeriesKind::Area,
            data: recent
                .iter()
                .map(|p| ChartPoint::close(p.date, p.close))
                .collect(),
            color: HISTORY_COLOR.to_string(),
            stroke_width: 2,
            fill: FillKind::Gradient,
        });

        series.extend(
            successes
                .iter()
                .filter(|r| !r.forecast.is_empty())
                .map(|r| forecast_series(anchor, r)),
        );

        tracing::debug!(
            "Built forecast chart: {} history points, {} model series",
            recent.len(),
            series.len() - 1
        );

        Ok(ChartSpec {
            chart_type: SeriesKind::Line,
            curve: Curve::Smooth,
            series,
        })
    }

    /// Build the chart and mount it on `surface`.
    pub fn render<S: ChartSurface + ?Sized>(
        &self,
        surface: &mut S,
        history: &HistoricalSeries,
        successes: &[ForecastResult],
    ) -> DashboardResult<ChartHandle> {
        let spec = self.build(history, successes)?;
        ChartHandle::mount(surface, spec)
    }
}

/// Forecast line starting on the anchor bar so it joins the history line.
pub fn forecast_series(anchor: &OhlcPoint, result: &ForecastResult) -> ChartSeries {
    let mut data = Vec::with_capacity(result.forecast.len() + 1);
    data.push(ChartPoint::close(anchor.date, anchor.close));
    data.extend(result.forecast.iter().enumerate().map_while(|(idx, price)| {
        anchor
            .date
            .checked_add_days(Days::new(idx as u64 + 1))
            .map(|date| ChartPoint::close(date, *price))
    }));

    ChartSeries {
        name: result.model.label(),
        kind: SeriesKind::Line,
        data,
        color: result.model.color().to_string(),
        stroke_width: 3,
        fill: FillKind::Solid,
    }
}
