//! Candle data structures for OHLCV data.

use serde::{Deserialize, Serialize};

/// OHLCV candle as delivered by the data-fetch layer.
///
/// `time` is a unix timestamp in seconds. Volume is optional because some
/// feeds only carry prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: Option<f64>) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Typical price, (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Whether the candle closed at or above its open.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Whether high/low enclose both open and close.
    pub fn has_valid_envelope(&self) -> bool {
        self.high >= self.open.max(self.close) && self.low <= self.open.min(self.close)
    }
}

/// Trait for types that provide OHLCV data.
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    /// Volume, with a missing value reported as zero.
    fn volume(&self) -> f64;
}

impl OHLCV for Candle {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_without_volume() {
        let json = r#"{"time": 1704067200, "open": 185.0, "high": 188.0, "low": 183.0, "close": 187.0}"#;
        let candle: Candle = serde_json::from_str(json).unwrap();
        assert_eq!(candle.time, 1_704_067_200);
        assert_eq!(candle.volume, None);
        assert_eq!(OHLCV::volume(&candle), 0.0);
    }

    #[test]
    fn test_envelope() {
        assert!(Candle::new(0, 10.0, 12.0, 9.0, 11.0, None).has_valid_envelope());
        assert!(!Candle::new(0, 10.0, 10.5, 9.0, 11.0, None).has_valid_envelope());
        assert!(!Candle::new(0, 10.0, 12.0, 10.5, 11.0, None).has_valid_envelope());
    }

    #[test]
    fn test_typical_price() {
        let candle = Candle::new(0, 10.0, 12.0, 9.0, 12.0, Some(5.0));
        assert!((candle.typical_price() - 11.0).abs() < 1e-12);
        assert!(candle.is_bullish());
    }
}
