use chrono::NaiveDate;
use dashboard_core::{DashboardError, DashboardResult, TickerProfile};
use serde::Serialize;
use std::fmt;

use crate::summary::Direction;

/// Price header shown above both dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteHeader {
    pub ticker: String,
    pub name: String,
    pub exchange: String,
    pub currency: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// Close-to-close change against the previous bar.
    pub change: f64,
    pub change_pct: f64,
    pub direction: Direction,
}

impl QuoteHeader {
    pub fn from_profile(profile: &TickerProfile) -> DashboardResult<Self> {
        profile.data.require_points(2)?;
        let (latest, prev) = match (profile.data.last(), profile.data.previous()) {
            (Some(latest), Some(prev)) => (latest, prev),
            _ => {
                return Err(DashboardError::InsufficientData(
                    "Insufficient data to display".to_string(),
                ))
            }
        };
        if prev.close <= 0.0 {
            return Err(DashboardError::InvalidResponse(format!(
                "previous close for {} is {}",
                profile.ticker, prev.close
            )));
        }

        let change = latest.close - prev.close;
        let change_pct = change / prev.close * 100.0;

        Ok(Self {
            ticker: profile.ticker.clone(),
            name: profile.name.clone(),
            exchange: profile.exchange.clone(),
            currency: profile.currency.clone(),
            date: latest.date,
            open: latest.open,
            high: latest.high,
            low: latest.low,
            close: latest.close,
            volume: latest.volume,
            change,
            change_pct,
            direction: Direction::of(change),
        })
    }

    /// `+1.23 (0.45%)` style change label.
    pub fn change_label(&self) -> String {
        let sign = if self.change >= 0.0 { "+" } else { "" };
        format!("{}{:.2} ({:.2}%)", sign, self.change, self.change_pct)
    }
}

impl fmt::Display for QuoteHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}) [{}]", self.name, self.ticker, self.exchange)?;
        writeln!(
            f,
            "{} {:.2}  {}  as of {}",
            self.currency,
            self.close,
            self.change_label(),
            self.date.format("%b %-d, %Y")
        )?;
        write!(
            f,
            "Open {c} {:.2}  High {c} {:.2}  Low {c} {:.2}  Volume {}",
            self.open,
            self.high,
            self.low,
            group_thousands(self.volume),
            c = self.currency
        )
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::{HistoricalSeries, OhlcPoint};

    fn profile(closes: &[f64]) -> TickerProfile {
        let start = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                OhlcPoint::new(
                    start + chrono::Days::new(i as u64),
                    c - 1.0,
                    c + 2.0,
                    c - 3.0,
                    c,
                    1_234_567,
                )
            })
            .collect();
        TickerProfile {
            ticker: "INFY.NS".to_string(),
            name: "Infosys Limited".to_string(),
            exchange: "NSE".to_string(),
            currency: "INR".to_string(),
            data: HistoricalSeries::new(points).unwrap(),
        }
    }

    #[test]
    fn test_header_change() {
        let header = QuoteHeader::from_profile(&profile(&[200.0, 205.0])).unwrap();
        assert_eq!(header.close, 205.0);
        assert!((header.change - 5.0).abs() < 1e-9);
        assert!((header.change_pct - 2.5).abs() < 1e-9);
        assert_eq!(header.direction, Direction::Up);
        assert_eq!(header.change_label(), "+5.00 (2.50%)");
    }

    #[test]
    fn test_header_negative_change() {
        let header = QuoteHeader::from_profile(&profile(&[200.0, 190.0])).unwrap();
        assert_eq!(header.direction, Direction::Down);
        assert_eq!(header.change_label(), "-10.00 (-5.00%)");
    }

    #[test]
    fn test_header_requires_two_points() {
        let err = QuoteHeader::from_profile(&profile(&[200.0])).unwrap_err();
        assert!(matches!(err, DashboardError::InsufficientData(_)));
    }

    #[test]
    fn test_display() {
        let text = QuoteHeader::from_profile(&profile(&[200.0, 205.0]))
            .unwrap()
            .to_string();
        assert!(text.starts_with("Infosys Limited (INFY.NS) [NSE]"));
        assert!(text.contains("INR 205.00  +5.00 (2.50%)  as of Jan 10, 2024"));
        assert!(text.contains("Volume 1,234,567"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(12_345_678), "12,345,678");
    }
}
