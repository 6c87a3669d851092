//! Boundary to the rendering widget.
//!
//! The chart core never talks to a concrete widget library. It drives any
//! type implementing [`ChartSurface`], which draws panes and series and reports
//! user navigation through visible-range subscriptions.

pub mod headless;

use charter_core::{Candle, Color, DerivedPoint};
use thiserror::Error;

pub use headless::{HeadlessSurface, SurfaceCall};

/// Handle to a pane created by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(pub u64);

/// Handle to a series created by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(pub u64);

/// Time-axis window a pane displays, in candle time (unix seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisibleRange {
    pub from: i64,
    pub to: i64,
}

impl VisibleRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// Shift both ends by `delta` seconds.
    pub fn shifted(&self, delta: i64) -> Self {
        Self::new(self.from + delta, self.to + delta)
    }
}

/// Errors a surface may report. All of them are treated as non-fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("unknown pane {0:?}")]
    UnknownPane(PaneId),
    #[error("unknown series {0:?}")]
    UnknownSeries(SeriesId),
    #[error("pane {0:?} is not ready")]
    NotReady(PaneId),
}

/// Role of a pane in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneRole {
    /// The candlestick pane, sole source of navigation.
    Main,
    /// A stacked indicator sub-pane that follows the main pane.
    Panel,
}

/// Options for a new pane.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneConfig {
    pub role: PaneRole,
    pub title: String,
    /// Position below the main pane, 0 for the main pane itself.
    pub stack_index: usize,
    pub time_axis_visible: bool,
    pub height: u32,
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesStyle {
    Candlestick { up: Color, down: Color },
    Line { color: Color },
    /// Bars colored by each point's tone.
    Histogram { positive: Color, negative: Color },
}

/// Options for a new series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesConfig {
    pub title: String,
    pub style: SeriesStyle,
}

impl SeriesConfig {
    pub fn new(title: impl Into<String>, style: SeriesStyle) -> Self {
        Self {
            title: title.into(),
            style,
        }
    }
}

/// Data pushed to a series. Always a full replacement.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    Candles(Vec<Candle>),
    Line(Vec<DerivedPoint>),
    Histogram(Vec<DerivedPoint>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Candles(c) => c.len(),
            SeriesData::Line(p) | SeriesData::Histogram(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First and last time covered, if any.
    pub fn time_span(&self) -> Option<(i64, i64)> {
        match self {
            SeriesData::Candles(c) => Some((c.first()?.time, c.last()?.time)),
            SeriesData::Line(p) | SeriesData::Histogram(p) => Some((p.first()?.time, p.last()?.time)),
        }
    }
}

/// Callback invoked with a pane's new visible range.
pub type RangeCallback = Box<dyn FnMut(VisibleRange)>;

/// The one capability range followers get: being told where to look.
pub trait RangeSink {
    /// Programmatically move a pane's visible range.
    fn set_visible_range(&mut self, pane: PaneId, range: VisibleRange) -> Result<(), SurfaceError>;
}

/// Everything the chart core requires from a rendering widget.
pub trait ChartSurface: RangeSink {
    fn create_pane(&mut self, config: &PaneConfig) -> PaneId;

    /// Destroy a pane along with every series on it.
    fn destroy_pane(&mut self, pane: PaneId);

    fn add_series(&mut self, pane: PaneId, config: &SeriesConfig) -> Result<SeriesId, SurfaceError>;

    fn remove_series(&mut self, series: SeriesId);

    fn set_series_data(&mut self, series: SeriesId, data: SeriesData) -> Result<(), SurfaceError>;

    fn visible_range(&self, pane: PaneId) -> Option<VisibleRange>;

    /// Register for user-driven (and, on some widgets, programmatic) range changes.
    fn subscribe_visible_range_change(&mut self, pane: PaneId, callback: RangeCallback);

    /// Reset the pane's range to show all of its data.
    fn fit_content(&mut self, pane: PaneId);

    fn set_time_axis_visible(&mut self, pane: PaneId, visible: bool);

    /// Move a pane to `index` in the vertical stack. The main pane is 0.
    fn set_stack_index(&mut self, pane: PaneId, index: usize);
}
