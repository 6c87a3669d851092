//! Indicator framework for technical analysis.
//!
//! Every indicator is a pure function of the full candle sequence. Output
//! points always carry the time of the candle they were derived from.

pub mod engine;
pub mod indicator;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod volume;
pub mod vwap;

pub use engine::{compute, EngineSettings, IndicatorEngine};
pub use indicator::{
    Indicator, IndicatorConfig, IndicatorKind, IndicatorOutput, IndicatorSpec, ParseKindError,
    Placement, PriceSource, DEFAULT_RSI_PERIOD,
};
pub use macd::{Macd, MacdConfig, MacdLines, MacdOutput};
pub use moving_average::{calculate_ema, calculate_sma, ema, sma, Ema, MovingAverageConfig, Sma};
pub use rsi::{rsi, Rsi, RsiConfig, LOSS_EPSILON};
pub use volume::{volume_bars, Volume, VolumeConfig};
pub use vwap::{vwap, Vwap, VwapConfig};
