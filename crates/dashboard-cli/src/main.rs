//! stockdash: terminal front end for the stock forecasting backend.
//!
//! Usage:
//!   stockdash login --user alice --password s3cret
//!   stockdash quote INFY.NS --period 1Y
//!   stockdash forecast AAPL --target 2024-01-15 --models lstm,arima

mod args;
mod commands;
mod config;
mod session;

use std::process::ExitCode;

use args::{Command, USAGE};
use commands::App;
use config::AppConfig;
use dashboard_core::DashboardError;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("command failed: {:#}", e);
            match e.downcast_ref::<DashboardError>() {
                Some(DashboardError::Unauthenticated) => {
                    eprintln!("Not logged in. Run `stockdash login --user <name> --password <password>` first.");
                }
                Some(err) => eprintln!("{}", err.user_message()),
                None => eprintln!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stockdash=info,forecast_aggregator=info,warn".into());

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let app = App::new(AppConfig::from_env()?);

    match command {
        Command::Login { username, password } => app.login(&username, &password).await,
        Command::Signup { username, password } => app.signup(&username, &password).await,
        Command::Logout => app.logout(),
        Command::Quote {
            ticker,
            period,
            style,
        } => app.quote(&ticker, period, style).await,
        Command::Forecast {
            ticker,
            target,
            models,
        } => app.forecast(&ticker, &target, models).await,
        Command::Help => Ok(()),
    }
}
