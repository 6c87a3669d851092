//! VWAP (Volume Weighted Average Price) indicator.

use charter_core::{Candle, TimeSeries, OHLCV};

use crate::indicator::{Indicator, IndicatorConfig, IndicatorOutput};

/// VWAP configuration. The accumulation is anchored at the first candle.
#[derive(Debug, Clone, Default)]
pub struct VwapConfig;

impl IndicatorConfig for VwapConfig {}

/// Cumulative VWAP from the first candle forward.
///
/// `Σ(typical price · volume) / Σ volume`, never reset mid-sequence. A slot
/// stays empty until cumulative volume is strictly positive; a missing volume
/// counts as zero.
pub fn vwap(candles: &[Candle]) -> TimeSeries<f64> {
    let mut cumulative_pv = 0.0;
    let mut cumulative_volume = 0.0;

    let values = candles
        .iter()
        .map(|candle| {
            let volume = OHLCV::volume(candle);
            cumulative_pv += candle.typical_price() * volume;
            cumulative_volume += volume;
            (cumulative_volume > 0.0).then(|| cumulative_pv / cumulative_volume)
        })
        .collect();

    TimeSeries::with_offset(values, 0)
}

/// VWAP indicator.
pub struct Vwap;

impl Indicator for Vwap {
    type Config = VwapConfig;

    fn new(_config: Self::Config) -> Self {
        Self
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorOutput {
        IndicatorOutput::Line(vwap(candles).to_points(candles))
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn is_overlay(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "VWAP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, high: f64, low: f64, close: f64, volume: Option<f64>) -> Candle {
        Candle::new(time, close, high, low, close, volume)
    }

    #[test]
    fn test_zero_volume_is_empty() {
        let candles: Vec<Candle> = (0..10).map(|i| candle(i, 11.0, 9.0, 10.0, Some(0.0))).collect();
        assert!(vwap(&candles).to_points(&candles).is_empty());

        let missing: Vec<Candle> = (0..10).map(|i| candle(i, 11.0, 9.0, 10.0, None)).collect();
        assert!(vwap(&missing).to_points(&missing).is_empty());
    }

    #[test]
    fn test_cumulative_value() {
        let candles = vec![
            candle(0, 12.0, 9.0, 9.0, Some(0.0)),   // tp 10, skipped
            candle(60, 12.0, 9.0, 12.0, Some(2.0)), // tp 11
            candle(120, 15.0, 12.0, 15.0, Some(1.0)), // tp 14
        ];
        let points = vwap(&candles).to_points(&candles);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].time, 60);
        assert!((points[0].value - 11.0).abs() < 1e-9);
        // (11*2 + 14*1) / 3 = 12
        assert_eq!(points[1].time, 120);
        assert!((points[1].value - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_never_resets() {
        let mut candles: Vec<Candle> = (0..5).map(|i| candle(i * 86_400, 11.0, 9.0, 10.0, Some(1.0))).collect();
        candles.push(candle(5 * 86_400, 21.0, 19.0, 20.0, Some(0.0)));
        let points = vwap(&candles).to_points(&candles);

        assert_eq!(points.len(), 6);
        // zero-volume candle keeps the running average
        assert!((points[5].value - 10.0).abs() < 1e-9);
    }
}
