pub mod chart;
pub mod forecast;
pub mod header;
pub mod market;
pub mod summary;
pub mod surface;

pub use chart::{ChartPoint, ChartSeries, ChartSpec, Curve, FillKind, PointValue, SeriesKind};
pub use forecast::{forecast_series, ForecastChart, FORECAST_CONTEXT_DAYS};
pub use header::QuoteHeader;
pub use market::{ChartPeriod, MarketChart, MarketChartStyle};
pub use summary::{summarize, Direction, SummaryCard};
pub use surface::{ChartHandle, ChartSlot, ChartSurface, JsonFileSurface, MountId};
