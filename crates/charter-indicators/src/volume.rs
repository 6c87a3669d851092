//! Volume histogram.

use charter_core::{Candle, DerivedPoint, Tone};

use crate::indicator::{Indicator, IndicatorConfig, IndicatorOutput};

/// Volume histogram configuration.
#[derive(Debug, Clone, Default)]
pub struct VolumeConfig;

impl IndicatorConfig for VolumeConfig {}

/// One bar per candle that reports a volume, toned by candle direction.
pub fn volume_bars(candles: &[Candle]) -> Vec<DerivedPoint> {
    candles
        .iter()
        .filter_map(|c| {
            let tone = if c.is_bullish() { Tone::Positive } else { Tone::Negative };
            c.volume.map(|v| DerivedPoint::with_tone(c.time, v, tone))
        })
        .collect()
}

/// Volume indicator.
pub struct Volume;

impl Indicator for Volume {
    type Config = VolumeConfig;

    fn new(_config: Self::Config) -> Self {
        Self
    }

    fn calculate(&self, candles: &[Candle]) -> IndicatorOutput {
        IndicatorOutput::Histogram(volume_bars(candles))
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn is_overlay(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "Volume"
    }
}
