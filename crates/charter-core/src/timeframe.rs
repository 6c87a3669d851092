//! Timeframe types and series identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Timeframe enumeration for different chart periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Timeframe {
    Min1,   // 1 minute
    Min5,   // 5 minutes
    Min15,  // 15 minutes
    Hour1,  // 1 hour
    Hour4,  // 4 hours
    #[default]
    Day1,   // 1 day
    Week1,  // 1 week
    Month1, // 1 month
}

impl Timeframe {
    /// Returns the nominal duration of this timeframe in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Timeframe::Min1 => 60,
            Timeframe::Min5 => 60 * 5,
            Timeframe::Min15 => 60 * 15,
            Timeframe::Hour1 => 60 * 60,
            Timeframe::Hour4 => 60 * 60 * 4,
            Timeframe::Day1 => 60 * 60 * 24,
            Timeframe::Week1 => 60 * 60 * 24 * 7,
            Timeframe::Month1 => 60 * 60 * 24 * 30,
        }
    }

    /// Returns a short label for this timeframe.
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Min1 => "1m",
            Timeframe::Min5 => "5m",
            Timeframe::Min15 => "15m",
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Day1 => "1d",
            Timeframe::Week1 => "1w",
            Timeframe::Month1 => "1M",
        }
    }

    /// Returns all available timeframes in order.
    pub fn all() -> &'static [Timeframe] {
        &[
            Timeframe::Min1,
            Timeframe::Min5,
            Timeframe::Min15,
            Timeframe::Hour1,
            Timeframe::Hour4,
            Timeframe::Day1,
            Timeframe::Week1,
            Timeframe::Month1,
        ]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::all()
            .iter()
            .copied()
            .find(|tf| tf.label() == s)
            .ok_or_else(|| format!("unknown timeframe {s:?}"))
    }
}

impl TryFrom<String> for Timeframe {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.label().to_string()
    }
}

/// Identity of a loaded candle series.
///
/// Two loads with the same key are the same series refreshed; a different key
/// (ticker or timeframe change) is a genuinely new series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl SeriesKey {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol, self.timeframe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for tf in Timeframe::all() {
            assert_eq!(tf.label().parse::<Timeframe>().unwrap(), *tf);
        }
        assert!("2d".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_minute_and_month_are_distinct() {
        assert_eq!("1m".parse::<Timeframe>().unwrap(), Timeframe::Min1);
        assert_eq!("1M".parse::<Timeframe>().unwrap(), Timeframe::Month1);
    }

    #[test]
    fn test_series_key_identity() {
        let a = SeriesKey::new("AAPL", Timeframe::Day1);
        assert_eq!(a, SeriesKey::new("AAPL", Timeframe::Day1));
        assert_ne!(a, SeriesKey::new("AAPL", Timeframe::Hour1));
        assert_eq!(a.to_string(), "AAPL 1d");
    }
}
