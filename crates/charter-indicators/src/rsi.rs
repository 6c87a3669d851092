//! RSI (Relative Strength Index) indicator.

use charter_core::{Candle, TimeSeries};

use crate::indicator::{Indicator, IndicatorConfig, IndicatorOutput, DEFAULT_RSI_PERIOD};

/// Floor applied to the average loss so a loss-free window never divides by zero.
pub const LOSS_EPSILON: f64 = 0.0001;

/// RSI indicator configuration.
#[derive(Debug, Clone)]
pub struct RsiConfig {
    /// Number of close-to-close deltas averaged per value (default: 14).
    pub period: usize,
    /// Overbought reference line.
    pub upper_bound: f64,
    /// Oversold reference line.
    pub lower_bound: f64,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_RSI_PERIOD,
            upper_bound: 70.0,
            lower_bound: 30.0,
        }
    }
}

impl IndicatorConfig for RsiConfig {}

/// Calculate RSI over closes.
///
/// Deltas are `d[i] = close[i + 1] - close[i]`. For every change index `i` in
/// `period..d.len()` the window `d[i - period..i]` is averaged (simple means
/// over `period`), and the value is pinned to candle `i + 1`. The first value
/// therefore lands on candle `period + 1` and the series holds
/// `n - 1 - period` values.
pub fn rsi(candles: &[Candle], period: usize) -> TimeSeries<f64> {
    if period == 0 || candles.len() < 2 {
        return TimeSeries::new();
    }

    let deltas: Vec<f64> = candles.windows(2).map(|w| w[1].close - w[0].close).collect();
    if deltas.len() <= period {
        return TimeSeries::new();
    }

    let values: Vec<f64> = (period..deltas.len())
        .map(|i| {
            let window = &deltas[i - period..i];
            let gains: f64 = window.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
            let losses: f64 = window.iter().filter(|d| **d < 0.0).map(|d| d.abs()).sum::<f64>() / period as f64;
            let rs = gains / losses.max(LOSS_EPSILON);
            100.0 - 100.0 / (1.0 + rs)
        })
        .collect();

    TimeSeries::from_values(&values, period + 1)
}

/// RSI indicator.
pub struct Rsi {
    config: RsiConfig,
}

impl Indicator for Rsi {
    type Config = RsiConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorOutput {
        IndicatorOutput::Oscillator {
            values: rsi(candles, self.config.period).to_points(candles),
            upper_bound: self.config.upper_bound,
            lower_bound: self.config.lower_bound,
        }
    }

    fn min_periods(&self) -> usize {
        // period deltas for the window plus the delta that carries the value
        self.config.period + 2
    }

    fn is_overlay(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "RSI"
    }
}
