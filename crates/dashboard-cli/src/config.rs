use anyhow::{bail, Context, Result};
use forecast_client::EndpointConfig;
use std::path::PathBuf;

use chart_renderer::FORECAST_CONTEXT_DAYS;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoints: EndpointConfig,
    /// Historical bars shown on the forecast chart.
    pub chart_window: usize,
    /// Where chart JSON files are written.
    pub output_dir: PathBuf,
    /// Directory holding the session marker.
    pub session_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chart_window: usize = match get("STOCKDASH_CHART_WINDOW") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("STOCKDASH_CHART_WINDOW is not a number: {raw:?}"))?,
            None => FORECAST_CONTEXT_DAYS,
        };
        if chart_window == 0 {
            bail!("STOCKDASH_CHART_WINDOW must be at least 1");
        }

        let session_dir = match get("STOCKDASH_SESSION_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .context("Cannot determine config directory; set STOCKDASH_SESSION_DIR")?
                .join("stockdash"),
        };

        let config = Self {
            endpoints: EndpointConfig::from_vars(&get),
            chart_window,
            output_dir: get("STOCKDASH_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            session_dir,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("market", &self.endpoints.market_url),
            ("predict", &self.endpoints.predict_url),
            ("auth", &self.endpoints.auth_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("{} endpoint must be an http(s) URL, got {:?}", name, url);
            }
        }
        Ok(())
    }
}
