//! JSON payloads from the daily-candles API.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use charter_core::Candle;
use serde::{Deserialize, Serialize};

use crate::DataSource;

/// Response body of `GET /api/daily/{ticker}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyResponse {
    pub ticker: String,
    pub candles: Vec<Candle>,
}

/// Parse an API response, rejecting an empty candle list.
pub fn parse_daily_response(text: &str) -> anyhow::Result<DailyResponse> {
    let response: DailyResponse = serde_json::from_str(text).context("decoding candle payload")?;
    if response.candles.is_empty() {
        bail!("No candles returned for ticker {}", response.ticker);
    }
    Ok(response)
}

/// Loads a saved API response from disk.
pub struct JsonLoader {
    path: PathBuf,
}

impl JsonLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the full response, ticker included.
    pub fn load_response(&self) -> anyhow::Result<DailyResponse> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let response = parse_daily_response(&text)?;
        log::info!(
            "Loaded {} candles for {} from {}",
            response.candles.len(),
            response.ticker,
            self.path.display()
        );
        Ok(response)
    }
}

impl DataSource for JsonLoader {
    fn load(&self) -> anyhow::Result<Vec<Candle>> {
        Ok(self.load_response()?.candles)
    }
}
