//! Chart core for a candlestick view with stacked indicator panes.
//!
//! This crate ties the pieces together:
//! - `IndicatorRegistry` - Active indicators, their ids and palette colors
//! - `PaneCoordinator` - Maps indicators onto panes and series of a surface
//! - `RangeChannel` - One-way time-range sync from the main pane to panels
//! - `ChartSession` - The boundary a UI drives
//!
//! Rendering is abstracted behind [`surface::ChartSurface`]; [`HeadlessSurface`]
//! is an in-memory implementation.

pub mod colors;
pub mod error;
pub mod indicators;
pub mod panes;
pub mod session;
pub mod surface;
pub mod sync;

pub use colors::ColorAllocator;
pub use error::ChartError;
pub use indicators::{IndicatorId, IndicatorInstance, IndicatorRegistry};
pub use panes::{PaneCoordinator, Resource};
pub use session::{engine_settings_from, ChartSession, ColorAssignedCallback};
pub use surface::{
    ChartSurface, HeadlessSurface, PaneConfig, PaneId, PaneRole, RangeCallback, RangeSink, SeriesConfig,
    SeriesData, SeriesId, SeriesStyle, SurfaceCall, SurfaceError, VisibleRange,
};
pub use sync::{RangeChannel, RangeFollower, RangePublisher};
