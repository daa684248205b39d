use anyhow::{anyhow, bail, Context, Result};
use chart_renderer::{ChartPeriod, MarketChartStyle};
use chrono::{Days, NaiveDate};
use dashboard_core::ModelId;

pub const USAGE: &str = "\
Usage:
  stockdash login --user <name> --password <password>
  stockdash signup --user <name> --password <password>
  stockdash logout
  stockdash quote <TICKER> [--period 1M|1Y|5Y] [--candles]
  stockdash forecast <TICKER> [--target YYYY-MM-DD | --days N] [--models lstm,prophet,xgboost,arima,tft]";

/// Days ahead used when no target is given.
pub const DEFAULT_HORIZON_DAYS: u64 = 14;

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Date(NaiveDate),
    DaysAhead(u64),
}

impl Target {
    pub fn resolve(&self, today: NaiveDate) -> Result<NaiveDate> {
        match self {
            Target::Date(date) => Ok(*date),
            Target::DaysAhead(days) => today
                .checked_add_days(Days::new(*days))
                .ok_or_else(|| anyhow!("{} days from {} is out of range", days, today)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { username: String, password: String },
    Signup { username: String, password: String },
    Logout,
    Quote {
        ticker: String,
        period: ChartPeriod,
        style: MarketChartStyle,
    },
    Forecast {
        ticker: String,
        target: Target,
        models: Vec<ModelId>,
    },
    Help,
}

impl Command {
    /// Parse arguments after the program name.
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some(name) = args.first() else {
            return Ok(Command::Help);
        };
        let rest = &args[1..];

        match name.as_str() {
            "login" | "signup" => {
                let username = flag_value(rest, "--user")?.context("--user is required")?;
                let password =
                    flag_value(rest, "--password")?.context("--password is required")?;
                Ok(if name == "login" {
                    Command::Login { username, password }
                } else {
                    Command::Signup { username, password }
                })
            }
            "logout" => Ok(Command::Logout),
            "quote" => Ok(Command::Quote {
                ticker: positional(rest).context("quote needs a ticker")?,
                period: match flag_value(rest, "--period")? {
                    Some(p) => p.parse()?,
                    None => ChartPeriod::default(),
                },
                style: if rest.iter().any(|a| a == "--candles") {
                    MarketChartStyle::Candlestick
                } else {
                    MarketChartStyle::Area
                },
            }),
            "forecast" => {
                let ticker = positional(rest).context("forecast needs a ticker")?;
                let target = match (flag_value(rest, "--target")?, flag_value(rest, "--days")?) {
                    (Some(_), Some(_)) => bail!("use either --target or --days, not both"),
                    (Some(date), None) => Target::Date(
                        NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                            .with_context(|| format!("invalid --target date {date:?}"))?,
                    ),
                    (None, Some(days)) => Target::DaysAhead(
                        days.parse()
                            .with_context(|| format!("invalid --days value {days:?}"))?,
                    ),
                    (None, None) => Target::DaysAhead(DEFAULT_HORIZON_DAYS),
                };
                let models = match flag_value(rest, "--models")? {
                    Some(list) => list
                        .split(',')
                        .filter(|m| !m.trim().is_empty())
                        .map(ModelId::from)
                        .collect(),
                    None => ModelId::all(),
                };
                Ok(Command::Forecast {
                    ticker,
                    target,
                    models,
                })
            }
            "help" | "--help" | "-h" => Ok(Command::Help),
            other => bail!("unknown command {other:?}\n\n{USAGE}"),
        }
    }
}

fn flag_value(args: &[String], flag: &str) -> Result<Option<String>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args
            .get(i + 1)
            .filter(|v| !v.starts_with("--"))
            .cloned()
            .map(Some)
            .ok_or_else(|| anyhow!("{flag} needs a value")),
        None => Ok(None),
    }
}

/// First argument that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<String> {
    const VALUED: &[&str] = &["--period", "--target", "--days", "--models", "--user", "--password"];
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUED.contains(&arg.as_str()) {
            skip_next = true;
        } else if !arg.starts_with("--") {
            return Some(arg.clone());
        }
    }
    None
}
