//! MACD (Moving Average Convergence Divergence) indicator.

use charter_core::{Candle, DerivedPoint, TimeSeries};

use crate::indicator::{Indicator, IndicatorConfig, IndicatorOutput, PriceSource};
use crate::moving_average::calculate_ema;

/// MACD indicator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacdConfig {
    /// Fast EMA period (default: 12).
    pub fast_period: usize,
    /// Slow EMA period (default: 26).
    pub slow_period: usize,
    /// Signal line EMA period (default: 9).
    pub signal_period: usize,
    /// Price source for calculation.
    pub price_source: PriceSource,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            price_source: PriceSource::Close,
        }
    }
}

impl IndicatorConfig for MacdConfig {}

impl MacdConfig {
    /// Generate a label string for this MACD configuration.
    pub fn label(&self) -> String {
        format!(
            "MACD({},{},{})",
            self.fast_period, self.slow_period, self.signal_period
        )
    }
}

/// MACD indicator output, aligned on candle indices.
#[derive(Debug, Clone)]
pub struct MacdOutput {
    /// MACD line values (fast EMA - slow EMA).
    pub macd_line: TimeSeries<f64>,
    /// Signal line values (EMA of MACD line).
    pub signal_line: TimeSeries<f64>,
    /// Histogram values (MACD - Signal).
    pub histogram: TimeSeries<f64>,
}

impl MacdOutput {
    fn empty() -> Self {
        Self {
            macd_line: TimeSeries::new(),
            signal_line: TimeSeries::new(),
            histogram: TimeSeries::new(),
        }
    }

    /// Pin every series to candle times. Histogram points are toned by sign.
    pub fn to_lines(&self, candles: &[Candle]) -> MacdLines {
        MacdLines {
            macd_line: self.macd_line.to_points(candles),
            signal_line: self.signal_line.to_points(candles),
            histogram: self.histogram.to_toned_points(candles),
        }
    }
}

/// MACD output as time-pinned points, ready to hand to a renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdLines {
    pub macd_line: Vec<DerivedPoint>,
    pub signal_line: Vec<DerivedPoint>,
    pub histogram: Vec<DerivedPoint>,
}

/// MACD indicator.
pub struct Macd {
    config: MacdConfig,
}

impl Indicator for Macd {
    type Config = MacdConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorOutput {
        IndicatorOutput::Macd(self.calculate_macd(candles).to_lines(candles))
    }

    fn min_periods(&self) -> usize {
        // Need slow_period for first MACD value, then signal_period more for signal line
        self.config.slow_period + self.config.signal_period - 1
    }

    fn is_overlay(&self) -> bool {
        // MACD is displayed in a separate pane, not overlaid on price
        false
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

impl Macd {
    /// Calculate MACD values and return structured output.
    pub fn calculate_macd(&self, candles: &[Candle]) -> MacdOutput {
        let MacdConfig {
            fast_period,
            slow_period,
            signal_period,
            price_source,
        } = self.config;

        if fast_period == 0 || slow_period == 0 || signal_period == 0 {
            return MacdOutput::empty();
        }

        let prices = price_source.extract_all(candles);
        let macd_start = fast_period.max(slow_period) - 1;
        if prices.len() <= macd_start {
            return MacdOutput::empty();
        }

        let fast_ema = calculate_ema(&prices, fast_period);
        let slow_ema = calculate_ema(&prices, slow_period);

        // MACD line = Fast EMA - Slow EMA, matched on candle index
        let macd_values: Vec<f64> = (macd_start..prices.len())
            .map(|i| fast_ema[i + 1 - fast_period] - slow_ema[i + 1 - slow_period])
            .collect();

        // Signal line = EMA of MACD line, seeded with the mean of the first signal_period values
        let signal_values = calculate_ema(&macd_values, signal_period);
        let signal_offset = signal_period - 1;
        let signal_start = macd_start + signal_offset;

        // Histogram = MACD - Signal at aligned indices
        let histogram_values: Vec<f64> = signal_values
            .iter()
            .enumerate()
            .map(|(i, signal)| macd_values[i + signal_offset] - signal)
            .collect();

        MacdOutput {
            macd_line: TimeSeries::from_values(&macd_values, macd_start),
            signal_line: TimeSeries::from_values(&signal_values, signal_start),
            histogram: TimeSeries::from_values(&histogram_values, signal_start),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MacdConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charter_core::Tone;

    fn make_candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                time: 1_700_000_000 + i as i64 * 3_600,
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: Some(100.0),
            })
            .collect()
    }

    #[test]
    fn test_macd_basic() {
        // Create enough candles for MACD calculation
        let closes: Vec<f64> = (1..=50).map(|i| 100.0 + i as f64).collect();
        let candles = make_candles(&closes);

        let macd = Macd::new(MacdConfig::default());
        let output = macd.calculate_macd(&candles);

        // MACD line should start at index 25 (slow_period - 1)
        assert_eq!(output.macd_line.start_index(), 25);
        assert_eq!(output.macd_line.len(), 25);

        // Signal line should start at index 33 (slow_period + signal_period - 2)
        assert_eq!(output.signal_line.start_index(), 33);

        // Histogram should start at same index as signal
        assert_eq!(output.histogram.start_index(), 33);
        assert_eq!(output.histogram.len(), output.signal_line.len());

        // Values should exist
        assert!(output.macd_line.get(25).is_some());
        assert!(output.signal_line.get(33).is_some());
        assert!(output.histogram.get(33).is_some());
    }

    #[test]
    fn test_signal_seed_is_mean_of_first_nine() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 8.0).collect();
        let candles = make_candles(&closes);
        let output = Macd::new(MacdConfig::default()).calculate_macd(&candles);

        let first_nine: f64 = (25..34).map(|i| *output.macd_line.get(i).unwrap()).sum::<f64>() / 9.0;
        assert!((output.signal_line.get(33).unwrap() - first_nine).abs() < 1e-9);

        let hist = output.histogram.get(40).unwrap();
        let expected = output.macd_line.get(40).unwrap() - output.signal_line.get(40).unwrap();
        assert!((hist - expected).abs() < 1e-12);
    }

    #[test]
    fn test_lines_share_candle_times_and_tones() {
        let closes: Vec<f64> = (0..45).map(|i| 100.0 + (i as f64 * 0.5).cos() * 4.0).collect();
        let candles = make_candles(&closes);
        let lines = Macd::new(MacdConfig::default()).calculate_macd(&candles).to_lines(&candles);

        assert_eq!(lines.histogram.len(), lines.signal_line.len());
        assert_eq!(lines.macd_line[0].time, candles[25].time);
        assert_eq!(lines.signal_line[0].time, candles[33].time);
        for point in &lines.histogram {
            let tone = point.tone.unwrap();
            assert_eq!(tone, Tone::of(point.value));
        }
    }

    #[test]
    fn test_insufficient_data() {
        let candles = make_candles(&[1.0; 26]);
        let output = Macd::new(MacdConfig::default()).calculate_macd(&candles);
        assert_eq!(output.macd_line.len(), 1);
        assert!(output.signal_line.is_empty());
        assert!(output.histogram.is_empty());

        let output = Macd::new(MacdConfig::default()).calculate_macd(&candles[..10]);
        assert!(output.macd_line.is_empty());
    }

    #[test]
    fn test_macd_min_periods() {
        let macd = Macd::new(MacdConfig::default());
        assert_eq!(macd.min_periods(), 34); // 26 + 9 - 1
        assert_eq!(macd.config().label(), "MACD(12,26,9)");
    }
}
