//! Simple and exponential moving averages.

use charter_core::{Candle, TimeSeries};

use crate::indicator::{Indicator, IndicatorConfig, IndicatorOutput, PriceSource};

/// Moving average configuration shared by SMA and EMA.
#[derive(Debug, Clone)]
pub struct MovingAverageConfig {
    /// Lookback period.
    pub period: usize,
    /// Price source for calculation.
    pub price_source: PriceSource,
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            period: 20,
            price_source: PriceSource::Close,
        }
    }
}

impl IndicatorConfig for MovingAverageConfig {}

impl MovingAverageConfig {
    pub fn with_period(period: usize) -> Self {
        Self {
            period,
            ..Default::default()
        }
    }
}

/// Calculate Simple Moving Average. Output has `prices.len() - period + 1` values.
pub fn calculate_sma(prices: &[f64], period: usize) -> Vec<f64> {
    if prices.len() < period || period == 0 {
        return Vec::new();
    }

    let mut values = Vec::with_capacity(prices.len() - period + 1);
    let mut sum: f64 = prices[..period].iter().sum();
    values.push(sum / period as f64);

    for i in period..prices.len() {
        sum += prices[i] - prices[i - period];
        values.push(sum / period as f64);
    }

    values
}

/// Calculate Exponential Moving Average.
///
/// Seeded with the SMA of the first `period` prices, then
/// `ema = price * k + ema * (1 - k)` with `k = 2 / (period + 1)`.
pub fn calculate_ema(prices: &[f64], period: usize) -> Vec<f64> {
    if prices.len() < period || period == 0 {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema_values = Vec::with_capacity(prices.len() - period + 1);

    let mut ema: f64 = prices[..period].iter().sum::<f64>() / period as f64;
    ema_values.push(ema);

    for &price in &prices[period..] {
        ema = price * k + ema * (1.0 - k);
        ema_values.push(ema);
    }

    ema_values
}

/// SMA over candles, aligned so the first value sits at candle `period - 1`.
pub fn sma(candles: &[Candle], period: usize) -> TimeSeries<f64> {
    let prices = PriceSource::Close.extract_all(candles);
    TimeSeries::from_values(&calculate_sma(&prices, period), period.saturating_sub(1))
}

/// EMA over candles, aligned so the first value sits at candle `period - 1`.
pub fn ema(candles: &[Candle], period: usize) -> TimeSeries<f64> {
    let prices = PriceSource::Close.extract_all(candles);
    TimeSeries::from_values(&calculate_ema(&prices, period), period.saturating_sub(1))
}

/// Simple Moving Average indicator.
pub struct Sma {
    config: MovingAverageConfig,
}

impl Indicator for Sma {
    type Config = MovingAverageConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorOutput {
        let prices = self.config.price_source.extract_all(candles);
        let values = calculate_sma(&prices, self.config.period);
        let series = TimeSeries::from_values(&values, self.config.period.saturating_sub(1));
        IndicatorOutput::Line(series.to_points(candles))
    }

    fn min_periods(&self) -> usize {
        self.config.period
    }

    fn is_overlay(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average indicator.
pub struct Ema {
    config: MovingAverageConfig,
}

impl Indicator for Ema {
    type Config = MovingAverageConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorOutput {
        let prices = self.config.price_source.extract_all(candles);
        let values = calculate_ema(&prices, self.config.period);
        let series = TimeSeries::from_values(&values, self.config.period.saturating_sub(1));
        IndicatorOutput::Line(series.to_points(candles))
    }

    fn min_periods(&self) -> usize {
        self.config.period
    }

    fn is_overlay(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle::new(i as i64 * 86_400, close, close + 1.0, close - 1.0, close, Some(100.0)))
            .collect()
    }

    #[test]
    fn test_sma_concrete_scenario() {
        let candles = make_candles(&[10.0, 11.0, 12.0, 11.0, 13.0]);
        let output = Sma::new(MovingAverageConfig::with_period(3)).calculate(&candles);
        let IndicatorOutput::Line(points) = output else {
            panic!("expected line output");
        };

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].time, candles[2].time);
        assert!((points[0].value - 11.0).abs() < 1e-9);
        assert_eq!(points[1].time, candles[3].time);
        assert!((points[1].value - 34.0 / 3.0).abs() < 1e-9);
        assert_eq!(points[2].time, candles[4].time);
        assert!((points[2].value - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_sma_length_for_all_periods() {
        let closes: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let candles = make_candles(&closes);
        let n = candles.len();
        for p in 1..=n {
            assert_eq!(sma(&candles, p).len(), n - p + 1, "period {p}");
        }
    }

    #[test]
    fn test_short_input_is_empty() {
        let candles = make_candles(&[1.0, 2.0]);
        assert!(sma(&candles, 3).is_empty());
        assert!(ema(&candles, 3).is_empty());
        assert!(sma(&candles, 0).is_empty());
        assert!(ema(&[], 1).is_empty());
    }

    #[test]
    fn test_ema_calculation() {
        let prices = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let ema = calculate_ema(&prices, 3);

        assert_eq!(ema.len(), 8); // 10 - 3 + 1 = 8
        assert!((ema[0] - 2.0).abs() < 1e-9); // First value is SMA of [1,2,3] = 2.0
        // k = 0.5: 4 * 0.5 + 2 * 0.5 = 3
        assert!((ema[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ema_first_value_is_mean() {
        let closes = [3.0, 9.0, 4.0, 8.0, 1.0, 7.0];
        let candles = make_candles(&closes);
        let series = ema(&candles, 4);
        assert_eq!(series.start_index(), 3);
        assert!((series.get(3).unwrap() - 6.0).abs() < 1e-9);
    }
}
