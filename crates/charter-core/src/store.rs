//! The current candle sequence and crosshair lookups.

use thiserror::Error;

use crate::candle::Candle;

/// Reasons a candle sequence is rejected by [`CandleStore::replace`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CandleError {
    #[error("candle {index} at t={time} does not follow t={previous}")]
    NotIncreasing { index: usize, previous: i64, time: i64 },
    #[error("candle {index} at t={time} has high/low not enclosing open/close")]
    InvalidEnvelope { index: usize, time: i64 },
    #[error("candle {index} at t={time} has a non-finite price")]
    NonFinite { index: usize, time: i64 },
    #[error("candle {index} at t={time} has negative volume")]
    NegativeVolume { index: usize, time: i64 },
}

/// Check a full sequence against the candle invariants.
pub fn validate_candles(candles: &[Candle]) -> Result<(), CandleError> {
    for (index, candle) in candles.iter().enumerate() {
        let time = candle.time;
        let prices = [candle.open, candle.high, candle.low, candle.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(CandleError::NonFinite { index, time });
        }
        if !candle.has_valid_envelope() {
            return Err(CandleError::InvalidEnvelope { index, time });
        }
        if candle.volume.is_some_and(|v| !v.is_finite() || v < 0.0) {
            return Err(CandleError::NegativeVolume { index, time });
        }
        if index > 0 {
            let previous = candles[index - 1].time;
            if time <= previous {
                return Err(CandleError::NotIncreasing {
                    index,
                    previous,
                    time,
                });
            }
        }
    }
    Ok(())
}

/// Informational readout for the candle under the crosshair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
    /// Close-to-close change against the previous candle, in percent.
    pub change_pct: Option<f64>,
}

/// Holds the current immutable, time-ordered candle sequence.
///
/// The sequence is only ever swapped wholesale; there is no append or patch.
#[derive(Debug, Clone, Default)]
pub struct CandleStore {
    candles: Vec<Candle>,
}

impl CandleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole sequence. On error the previous sequence is kept.
    pub fn replace(&mut self, candles: Vec<Candle>) -> Result<(), CandleError> {
        validate_candles(&candles)?;
        self.candles = candles;
        Ok(())
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Index of the candle closest in time; ties go to the earlier candle.
    pub fn nearest_index(&self, time: i64) -> Option<usize> {
        if self.candles.is_empty() {
            return None;
        }
        match self.candles.binary_search_by_key(&time, |c| c.time) {
            Ok(idx) => Some(idx),
            Err(0) => Some(0),
            Err(idx) if idx >= self.candles.len() => Some(self.candles.len() - 1),
            Err(idx) => {
                let before = time - self.candles[idx - 1].time;
                let after = self.candles[idx].time - time;
                Some(if after < before { idx } else { idx - 1 })
            }
        }
    }

    /// The candle closest in time to `time`.
    pub fn nearest(&self, time: i64) -> Option<&Candle> {
        self.nearest_index(time).map(|idx| &self.candles[idx])
    }

    /// Build the crosshair readout for the candle nearest to `time`.
    pub fn readout(&self, time: i64) -> Option<Readout> {
        let idx = self.nearest_index(time)?;
        let candle = &self.candles[idx];
        let change_pct = idx
            .checked_sub(1)
            .map(|prev| self.candles[prev].close)
            .filter(|prev_close| *prev_close != 0.0)
            .map(|prev_close| (candle.close - prev_close) / prev_close * 100.0);

        Some(Readout {
            time: candle.time,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
            change_pct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_candles(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle::new(1_000 + i as i64 * 60, close, close + 1.0, close - 1.0, close, Some(10.0)))
            .collect()
    }

    #[test]
    fn test_replace_rejects_duplicates_and_keeps_previous() {
        let mut store = CandleStore::new();
        store.replace(make_candles(&[1.0, 2.0])).unwrap();

        let mut bad = make_candles(&[3.0, 4.0, 5.0]);
        bad[2].time = bad[1].time;
        let err = store.replace(bad).unwrap_err();
        assert!(matches!(err, CandleError::NotIncreasing { index: 2, .. }));
        assert_eq!(store.len(), 2);
        assert_eq!(store.last().unwrap().close, 2.0);
    }

    #[test]
    fn test_replace_rejects_bad_envelope() {
        let mut store = CandleStore::new();
        let mut bad = make_candles(&[3.0]);
        bad[0].high = 2.0;
        assert!(matches!(
            store.replace(bad),
            Err(CandleError::InvalidEnvelope { index: 0, .. })
        ));
    }

    #[test]
    fn test_replace_rejects_negative_volume() {
        let mut store = CandleStore::new();
        let mut bad = make_candles(&[3.0]);
        bad[0].volume = Some(-1.0);
        assert!(matches!(store.replace(bad), Err(CandleError::NegativeVolume { .. })));
    }

    #[test]
    fn test_nearest() {
        let mut store = CandleStore::new();
        assert!(store.nearest(0).is_none());
        store.replace(make_candles(&[1.0, 2.0, 3.0])).unwrap();

        assert_eq!(store.nearest(0).unwrap().time, 1_000);
        assert_eq!(store.nearest(1_060).unwrap().time, 1_060);
        assert_eq!(store.nearest(1_089).unwrap().time, 1_060);
        assert_eq!(store.nearest(1_091).unwrap().time, 1_120);
        // Tie goes to the earlier candle.
        assert_eq!(store.nearest(1_090).unwrap().time, 1_060);
        assert_eq!(store.nearest(9_999).unwrap().time, 1_120);
    }

    #[test]
    fn test_readout_change_pct() {
        let mut store = CandleStore::new();
        store.replace(make_candles(&[100.0, 110.0])).unwrap();

        let first = store.readout(1_000).unwrap();
        assert_eq!(first.change_pct, None);

        let second = store.readout(1_060).unwrap();
        assert!((second.change_pct.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(second.volume, Some(10.0));
    }
}
