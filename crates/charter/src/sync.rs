//! One-way visible-range broadcast from the main pane to panel panes.
//!
//! The main pane's range subscription owns the only [`RangePublisher`]. Panel
//! panes are wrapped in [`RangeFollower`]s, which can be moved through a
//! [`RangeSink`] but hold nothing that could publish. A follower therefore
//! cannot feed a change back into the channel, and the broadcast cannot cycle.
//!
//! Surfaces that echo programmatic range changes as change events would still
//! publish through the main pane's callback while a broadcast is running; the
//! channel drops anything published during a broadcast.

use std::cell::Cell;
use std::rc::Rc;

use crate::surface::{PaneId, RangeSink, VisibleRange};

#[derive(Debug, Default)]
struct ChannelState {
    /// Latest unprocessed range; older ones are superseded.
    pending: Cell<Option<VisibleRange>>,
    broadcasting: Cell<bool>,
    dropped: Cell<u64>,
}

/// Publishing end, handed to the main pane's range subscription only.
#[derive(Debug, Clone)]
pub struct RangePublisher {
    state: Rc<ChannelState>,
}

impl RangePublisher {
    /// Record a new main-pane range. Returns false if it was dropped because a
    /// broadcast is in progress.
    pub fn publish(&self, range: VisibleRange) -> bool {
        if self.state.broadcasting.get() {
            self.state.dropped.set(self.state.dropped.get() + 1);
            return false;
        }
        self.state.pending.set(Some(range));
        true
    }
}

/// A pane that mirrors the main pane's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeFollower {
    pane: PaneId,
}

impl RangeFollower {
    pub fn new(pane: PaneId) -> Self {
        Self { pane }
    }

    pub fn pane(&self) -> PaneId {
        self.pane
    }

    /// Move this follower to `range`. Failures are logged and ignored.
    pub fn apply(&self, sink: &mut dyn RangeSink, range: VisibleRange) -> bool {
        match sink.set_visible_range(self.pane, range) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Skipping range sync for {:?}: {}", self.pane, e);
                false
            }
        }
    }
}

/// Receiving end of the main pane's navigation events.
#[derive(Debug, Default)]
pub struct RangeChannel {
    state: Rc<ChannelState>,
}

impl RangeChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher for the main pane's subscription callback.
    pub fn publisher(&self) -> RangePublisher {
        RangePublisher {
            state: Rc::clone(&self.state),
        }
    }

    /// Take the latest published range, if any.
    pub fn take_pending(&self) -> Option<VisibleRange> {
        self.state.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.state.pending.get().is_some()
    }

    pub fn is_broadcasting(&self) -> bool {
        self.state.broadcasting.get()
    }

    /// Number of publications dropped because they arrived mid-broadcast.
    pub fn dropped_count(&self) -> u64 {
        self.state.dropped.get()
    }

    /// Set `range` on every follower. Returns how many accepted it.
    ///
    /// Publications made while this runs are dropped.
    pub fn broadcast(&self, sink: &mut dyn RangeSink, followers: &[RangeFollower], range: VisibleRange) -> usize {
        self.state.broadcasting.set(true);
        let applied = followers.iter().filter(|f| f.apply(sink, range)).count();
        self.state.broadcasting.set(false);
        applied
    }
}
