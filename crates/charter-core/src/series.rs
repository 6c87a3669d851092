//! TimeSeries container for indicator output.

use serde::{Deserialize, Serialize};

use crate::candle::Candle;

/// Sign-derived color tag carried by histogram points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Positive,
    Negative,
}

impl Tone {
    /// Tone of a signed value; zero counts as positive.
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Tone::Positive
        } else {
            Tone::Negative
        }
    }
}

/// A single derived value pinned to a source candle's time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedPoint {
    pub time: i64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
}

impl DerivedPoint {
    pub fn new(time: i64, value: f64) -> Self {
        Self {
            time,
            value,
            tone: None,
        }
    }

    pub fn with_tone(time: i64, value: f64, tone: Tone) -> Self {
        Self {
            time,
            value,
            tone: Some(tone),
        }
    }
}

/// A candle-index aligned series of values, typically used for indicator output.
#[derive(Debug, Clone)]
pub struct TimeSeries<T> {
    /// The values in the series, aligned with candle indices.
    values: Vec<Option<T>>,
    /// Starting index (offset from the first candle).
    start_index: usize,
}

impl<T> TimeSeries<T> {
    /// Creates a new empty TimeSeries.
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            start_index: 0,
        }
    }

    /// Creates a TimeSeries with the given values starting at the specified index.
    pub fn with_offset(values: Vec<Option<T>>, start_index: usize) -> Self {
        Self {
            values,
            start_index,
        }
    }

    /// Returns the starting index of this series.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Returns the number of slots in this series.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this series is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gets the value at the given candle index, if available.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.start_index {
            return None;
        }
        let local_idx = index - self.start_index;
        self.values.get(local_idx).and_then(|v| v.as_ref())
    }

    /// Returns an iterator over (candle index, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|val| (self.start_index + i, val)))
    }

    /// Returns the underlying values slice.
    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> TimeSeries<T> {
    /// Creates a TimeSeries from a slice of values, all present.
    pub fn from_values(values: &[T], start_index: usize) -> Self {
        Self {
            values: values.iter().cloned().map(Some).collect(),
            start_index,
        }
    }
}

impl TimeSeries<f64> {
    /// Pins every present value to the time of the candle at its index.
    ///
    /// Slots pointing past the end of `candles` are dropped; times are always
    /// copied from the source candle.
    pub fn to_points(&self, candles: &[Candle]) -> Vec<DerivedPoint> {
        self.iter()
            .filter_map(|(idx, value)| candles.get(idx).map(|c| DerivedPoint::new(c.time, *value)))
            .collect()
    }

    /// Like [`TimeSeries::to_points`], tagging each point with the sign of its value.
    pub fn to_toned_points(&self, candles: &[Candle]) -> Vec<DerivedPoint> {
        self.iter()
            .filter_map(|(idx, value)| {
                candles
                    .get(idx)
                    .map(|c| DerivedPoint::with_tone(c.time, *value, Tone::of(*value)))
            })
            .collect()
    }
}
