use charter_core::CandleError;
use charter_indicators::{IndicatorKind, ParseKindError};
use thiserror::Error;

use crate::surface::SurfaceError;

/// Errors reported to callers of a chart session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("invalid period {period} for {kind}: must be a positive integer")]
    InvalidPeriod { kind: IndicatorKind, period: i64 },

    #[error("invalid period {0:?}: must be a positive integer")]
    InvalidPeriodText(String),

    #[error("{0} requires a period")]
    MissingPeriod(IndicatorKind),

    #[error("unknown indicator {0}")]
    UnknownIndicator(String),

    #[error(transparent)]
    UnknownKind(#[from] ParseKindError),

    #[error("rejected candles: {0}")]
    Candles(#[from] CandleError),

    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),
}
