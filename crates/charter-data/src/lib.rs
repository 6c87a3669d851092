//! Data loading utilities for charter.
//!
//! The HTTP fetch itself lives outside this workspace; these loaders parse
//! what it delivers (or what was saved from it) into candle sequences.

pub mod csv;
pub mod json;
pub mod source;

pub use self::csv::{load_candles_from_csv, CsvLoader};
pub use json::{parse_daily_response, DailyResponse, JsonLoader};
pub use source::DataSource;
