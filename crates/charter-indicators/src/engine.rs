//! Stateless dispatch from an [`IndicatorSpec`] to the matching indicator.

use charter_core::Candle;

use crate::indicator::{Indicator, IndicatorKind, IndicatorOutput, IndicatorSpec};
use crate::macd::{Macd, MacdConfig};
use crate::moving_average::{Ema, MovingAverageConfig, Sma};
use crate::rsi::{Rsi, RsiConfig};
use crate::volume::{Volume, VolumeConfig};
use crate::vwap::{Vwap, VwapConfig};

/// Parameters the engine applies to kinds without a caller-supplied period.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub macd: MacdConfig,
    pub rsi_upper_bound: f64,
    pub rsi_lower_bound: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let rsi = RsiConfig::default();
        Self {
            macd: MacdConfig::default(),
            rsi_upper_bound: rsi.upper_bound,
            rsi_lower_bound: rsi.lower_bound,
        }
    }
}

/// Pure transformation: candles + spec → time-aligned derived series.
///
/// Holds no state besides its settings; the same input always yields the
/// same output, and every call recomputes from the full sequence.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    settings: EngineSettings,
}

impl IndicatorEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Compute one indicator. Too little data yields an empty output, never an error.
    pub fn compute(&self, spec: &IndicatorSpec, candles: &[Candle]) -> IndicatorOutput {
        let period = spec.effective_period().unwrap_or(0);
        match spec.kind {
            IndicatorKind::Sma => Sma::new(MovingAverageConfig::with_period(period)).calculate(candles),
            IndicatorKind::Ema => Ema::new(MovingAverageConfig::with_period(period)).calculate(candles),
            IndicatorKind::Rsi => Rsi::new(RsiConfig {
                period,
                upper_bound: self.settings.rsi_upper_bound,
                lower_bound: self.settings.rsi_lower_bound,
            })
            .calculate(candles),
            IndicatorKind::Macd => Macd::new(self.settings.macd.clone()).calculate(candles),
            IndicatorKind::Vwap => Vwap::new(VwapConfig).calculate(candles),
            IndicatorKind::Volume => Volume::new(VolumeConfig).calculate(candles),
        }
    }

    /// Legend label for a spec, using the engine's MACD parameters.
    pub fn label(&self, spec: &IndicatorSpec) -> String {
        match spec.kind {
            IndicatorKind::Macd => self.settings.macd.label(),
            _ => spec.label(),
        }
    }
}

/// Compute with default settings.
pub fn compute(spec: &IndicatorSpec, candles: &[Candle]) -> IndicatorOutput {
    IndicatorEngine::default().compute(spec, candles)
}
