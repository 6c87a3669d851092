//! Core types for the charter application.
//!
//! This crate provides the fundamental data structures shared by every other crate:
//! - `Candle` - OHLCV candle data
//! - `CandleStore` - The current, wholesale-replaced candle sequence
//! - `TimeSeries` / `DerivedPoint` - Containers for indicator output
//! - `Color` - Display colors
//! - `Timeframe` / `SeriesKey` - Series identity

pub mod candle;
pub mod color;
pub mod series;
pub mod store;
pub mod timeframe;

pub use candle::{Candle, OHLCV};
pub use color::{Color, ParseColorError};
pub use series::{DerivedPoint, TimeSeries, Tone};
pub use store::{validate_candles, CandleError, CandleStore, Readout};
pub use timeframe::{SeriesKey, Timeframe};
