//! Renderer-agnostic chart description, serializable to ApexCharts options.

use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Area,
    Line,
    Candlestick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillKind {
    Gradient,
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    Smooth,
    Straight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PointValue {
    Close(f64),
    /// `[open, high, low, close]`
    Ohlc([f64; 4]),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    #[serde(rename = "x", serialize_with = "serialize_epoch_millis")]
    pub date: NaiveDate,
    #[serde(rename = "y")]
    pub value: PointValue,
}

impl ChartPoint {
    pub fn close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            value: PointValue::Close(close),
        }
    }

    pub fn ohlc(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            value: PointValue::Ohlc([open, high, low, close]),
        }
    }
}

/// Midnight UTC of `date` in milliseconds since the epoch.
pub fn epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

fn serialize_epoch_millis<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(epoch_millis(*date))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    pub data: Vec<ChartPoint>,
    #[serde(skip)]
    pub color: String,
    #[serde(skip)]
    pub stroke_width: u32,
    #[serde(skip)]
    pub fill: FillKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub chart_type: SeriesKind,
    pub curve: Curve,
    pub series: Vec<ChartSeries>,
}

impl ChartSpec {
    pub fn series_named(&self, name: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Total number of points across all series.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.data.len()).sum()
    }

    pub fn colors(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.color.as_str()).collect()
    }

    /// Options object in the shape ApexCharts expects.
    pub fn to_apex_options(&self) -> Value {
        let widths: Vec<u32> = self.series.iter().map(|s| s.stroke_width).collect();
        let fills: Vec<FillKind> = self.series.iter().map(|s| s.fill).collect();

        json!({
            "series": self.series,
            "chart": {
                "type": self.chart_type,
                "height": "100%",
                "toolbar": { "show": false },
            },
            "colors": self.colors(),
            "stroke": { "width": widths, "curve": self.curve },
            "fill": {
                "type": fills,
                "gradient": { "opacityFrom": 0.4, "opacityTo": 0.1 },
            },
            "xaxis": { "type": "datetime" },
            "legend": { "position": "top" },
            "dataLabels": { "enabled": false },
        })
    }
}

impl Serialize for ChartSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_apex_options().serialize(serializer)
    }
}
