//! Core indicator traits and types.

use std::fmt;
use std::str::FromStr;

use charter_core::{Candle, DerivedPoint};
use thiserror::Error;

use crate::macd::MacdLines;

/// Trait for indicator configuration.
pub trait IndicatorConfig: Clone + Default {}

/// Which price to use for indicator calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceSource {
    Open,
    High,
    Low,
    #[default]
    Close,
    /// (High + Low) / 2
    HL2,
    /// (High + Low + Close) / 3
    HLC3,
    /// (Open + High + Low + Close) / 4
    OHLC4,
}

impl PriceSource {
    /// Extract the price from a candle based on this source.
    pub fn extract(&self, candle: &Candle) -> f64 {
        match self {
            PriceSource::Open => candle.open,
            PriceSource::High => candle.high,
            PriceSource::Low => candle.low,
            PriceSource::Close => candle.close,
            PriceSource::HL2 => (candle.high + candle.low) / 2.0,
            PriceSource::HLC3 => candle.typical_price(),
            PriceSource::OHLC4 => (candle.open + candle.high + candle.low + candle.close) / 4.0,
        }
    }

    /// Extract this price from every candle.
    pub fn extract_all(&self, candles: &[Candle]) -> Vec<f64> {
        candles.iter().map(|c| self.extract(c)).collect()
    }
}

/// Where an indicator is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Extra line on the main candlestick pane, sharing its price scale.
    Overlay,
    /// Own stacked sub-pane below the main pane, sharing only the time axis.
    Panel,
}

/// The supported indicator types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Volume,
    Sma,
    Ema,
    Rsi,
    Macd,
    Vwap,
}

impl IndicatorKind {
    pub fn all() -> &'static [IndicatorKind] {
        &[
            IndicatorKind::Volume,
            IndicatorKind::Sma,
            IndicatorKind::Ema,
            IndicatorKind::Rsi,
            IndicatorKind::Macd,
            IndicatorKind::Vwap,
        ]
    }

    /// Lower-case identifier, also used for ids and parsing.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Volume => "volume",
            IndicatorKind::Sma => "sma",
            IndicatorKind::Ema => "ema",
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Macd => "macd",
            IndicatorKind::Vwap => "vwap",
        }
    }

    pub fn placement(&self) -> Placement {
        match self {
            IndicatorKind::Sma | IndicatorKind::Ema | IndicatorKind::Vwap => Placement::Overlay,
            IndicatorKind::Volume | IndicatorKind::Rsi | IndicatorKind::Macd => Placement::Panel,
        }
    }

    pub fn is_overlay(&self) -> bool {
        self.placement() == Placement::Overlay
    }

    /// Whether instances need a distinguishable line color from the palette.
    ///
    /// Volume and MACD are drawn with fixed histogram/line colors.
    pub fn uses_palette(&self) -> bool {
        !matches!(self, IndicatorKind::Volume | IndicatorKind::Macd)
    }

    /// Whether a period must be supplied by the caller.
    pub fn requires_period(&self) -> bool {
        matches!(self, IndicatorKind::Sma | IndicatorKind::Ema)
    }

    /// Whether a period is meaningful at all.
    pub fn takes_period(&self) -> bool {
        matches!(self, IndicatorKind::Sma | IndicatorKind::Ema | IndicatorKind::Rsi)
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognised indicator name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown indicator type {0:?}")]
pub struct ParseKindError(pub String);

impl FromStr for IndicatorKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        IndicatorKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

/// Default RSI lookback when none is given.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// A typed indicator request: kind plus optional period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorSpec {
    pub kind: IndicatorKind,
    pub period: Option<usize>,
}

impl IndicatorSpec {
    pub fn new(kind: IndicatorKind, period: Option<usize>) -> Self {
        Self { kind, period }
    }

    pub fn sma(period: usize) -> Self {
        Self::new(IndicatorKind::Sma, Some(period))
    }

    pub fn ema(period: usize) -> Self {
        Self::new(IndicatorKind::Ema, Some(period))
    }

    pub fn rsi(period: Option<usize>) -> Self {
        Self::new(IndicatorKind::Rsi, period)
    }

    pub fn macd() -> Self {
        Self::new(IndicatorKind::Macd, None)
    }

    pub fn vwap() -> Self {
        Self::new(IndicatorKind::Vwap, None)
    }

    pub fn volume() -> Self {
        Self::new(IndicatorKind::Volume, None)
    }

    /// The period the engine will use. `None` for kinds without one.
    ///
    /// A missing SMA/EMA period resolves to 0, which the engine treats as
    /// "no output".
    pub fn effective_period(&self) -> Option<usize> {
        match self.kind {
            IndicatorKind::Sma | IndicatorKind::Ema => Some(self.period.unwrap_or(0)),
            IndicatorKind::Rsi => Some(self.period.unwrap_or(DEFAULT_RSI_PERIOD)),
            IndicatorKind::Macd | IndicatorKind::Vwap | IndicatorKind::Volume => None,
        }
    }

    /// Short legend label, e.g. `SMA(20)`.
    pub fn label(&self) -> String {
        let name = match self.kind {
            IndicatorKind::Volume => "Volume",
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::Vwap => "VWAP",
        };
        match self.effective_period() {
            Some(period) => format!("{name}({period})"),
            None => name.to_string(),
        }
    }
}

/// Output from an indicator calculation. Every point carries a source candle time.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorOutput {
    /// Single line output (e.g., SMA, EMA, VWAP).
    Line(Vec<DerivedPoint>),
    /// Oscillator with values and reference bounds (e.g., RSI).
    Oscillator {
        values: Vec<DerivedPoint>,
        upper_bound: f64,
        lower_bound: f64,
    },
    /// Toned bars (e.g., volume).
    Histogram(Vec<DerivedPoint>),
    /// MACD line, signal line and histogram.
    Macd(MacdLines),
}

impl IndicatorOutput {
    /// True when no series carries a single point.
    pub fn is_empty(&self) -> bool {
        match self {
            IndicatorOutput::Line(points) | IndicatorOutput::Histogram(points) => points.is_empty(),
            IndicatorOutput::Oscillator { values, .. } => values.is_empty(),
            IndicatorOutput::Macd(lines) => {
                lines.macd_line.is_empty() && lines.signal_line.is_empty() && lines.histogram.is_empty()
            }
        }
    }

    /// The primary series: the line itself, or the MACD line.
    pub fn primary(&self) -> &[DerivedPoint] {
        match self {
            IndicatorOutput::Line(points) | IndicatorOutput::Histogram(points) => points,
            IndicatorOutput::Oscillator { values, .. } => values,
            IndicatorOutput::Macd(lines) => &lines.macd_line,
        }
    }
}

/// Trait for technical indicators.
pub trait Indicator {
    /// The configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Create a new indicator with the given configuration.
    fn new(config: Self::Config) -> Self;

    /// Calculate the indicator values for the given candles.
    fn calculate(&self, candles: &[Candle]) -> IndicatorOutput;

    /// Minimum number of candles required before the indicator produces output.
    fn min_periods(&self) -> usize;

    /// Whether this indicator should be overlaid on the price chart (true)
    /// or displayed in a separate pane (false).
    fn is_overlay(&self) -> bool;

    /// Human-readable name of the indicator.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("SMA".parse::<IndicatorKind>().unwrap(), IndicatorKind::Sma);
        assert_eq!(" vwap ".parse::<IndicatorKind>().unwrap(), IndicatorKind::Vwap);
        assert!("bollinger".parse::<IndicatorKind>().is_err());
    }

    #[test]
    fn test_placement() {
        for kind in [IndicatorKind::Sma, IndicatorKind::Ema, IndicatorKind::Vwap] {
            assert_eq!(kind.placement(), Placement::Overlay);
        }
        for kind in [IndicatorKind::Volume, IndicatorKind::Rsi, IndicatorKind::Macd] {
            assert_eq!(kind.placement(), Placement::Panel);
        }
    }

    #[test]
    fn test_palette_usage() {
        assert!(IndicatorKind::Rsi.uses_palette());
        assert!(IndicatorKind::Vwap.uses_palette());
        assert!(!IndicatorKind::Volume.uses_palette());
        assert!(!IndicatorKind::Macd.uses_palette());
    }

    #[test]
    fn test_effective_period_and_label() {
        assert_eq!(IndicatorSpec::rsi(None).effective_period(), Some(14));
        assert_eq!(IndicatorSpec::rsi(Some(7)).label(), "RSI(7)");
        assert_eq!(IndicatorSpec::sma(20).label(), "SMA(20)");
        assert_eq!(IndicatorSpec::macd().effective_period(), None);
        assert_eq!(IndicatorSpec::volume().label(), "Volume");
    }

    #[test]
    fn test_price_source() {
        let candle = Candle::new(0, 1.0, 4.0, 0.0, 2.0, None);
        assert_eq!(PriceSource::Close.extract(&candle), 2.0);
        assert_eq!(PriceSource::HL2.extract(&candle), 2.0);
        assert_eq!(PriceSource::OHLC4.extract(&candle), 1.75);
    }
}
