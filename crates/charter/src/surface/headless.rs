//! In-memory rendering surface.
//!
//! Keeps panes, series, data and ranges in plain collections and records every
//! call it receives. Used by the CLI and by tests to observe exactly what the
//! chart core asked the widget to do.

use std::collections::BTreeMap;

use super::{
    ChartSurface, PaneConfig, PaneId, RangeCallback, RangeSink, SeriesConfig, SeriesData, SeriesId,
    SurfaceError, VisibleRange,
};

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    CreatePane(PaneId),
    DestroyPane(PaneId),
    AddSeries(PaneId, SeriesId),
    RemoveSeries(SeriesId),
    SetSeriesData(SeriesId, usize),
    SetVisibleRange(PaneId, VisibleRange),
    FitContent(PaneId),
}

#[derive(Debug)]
pub struct PaneState {
    pub config: PaneConfig,
    pub range: Option<VisibleRange>,
    pub time_axis_visible: bool,
}

#[derive(Debug)]
pub struct SeriesState {
    pub pane: PaneId,
    pub config: SeriesConfig,
    pub data: SeriesData,
}

/// A surface with no pixels.
#[derive(Default)]
pub struct HeadlessSurface {
    next_id: u64,
    panes: BTreeMap<PaneId, PaneState>,
    series: BTreeMap<SeriesId, SeriesState>,
    subscribers: Vec<(PaneId, RangeCallback)>,
    /// When set, programmatic range changes notify every subscriber, the way a
    /// widget with a shared time scale reports them.
    echo_programmatic: bool,
    calls: Vec<SurfaceCall>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that re-emits programmatic range changes as change events.
    pub fn with_echo() -> Self {
        Self {
            echo_programmatic: true,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn notify(&mut self, pane: PaneId, range: VisibleRange, everyone: bool) {
        for (subscribed, callback) in self.subscribers.iter_mut() {
            if everyone || *subscribed == pane {
                callback(range);
            }
        }
    }

    /// Simulate the user panning or zooming a pane.
    ///
    /// Returns false for an unknown pane.
    pub fn user_set_visible_range(&mut self, pane: PaneId, range: VisibleRange) -> bool {
        let Some(state) = self.panes.get_mut(&pane) else {
            return false;
        };
        state.range = Some(range);
        self.notify(pane, range, false);
        true
    }

    pub fn pane(&self, pane: PaneId) -> Option<&PaneState> {
        self.panes.get(&pane)
    }

    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.panes.keys().copied().collect()
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    pub fn series(&self, series: SeriesId) -> Option<&SeriesState> {
        self.series.get(&series)
    }

    /// Series currently living on a pane, in creation order.
    pub fn series_on(&self, pane: PaneId) -> Vec<SeriesId> {
        self.series
            .iter()
            .filter(|(_, s)| s.pane == pane)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn series_data(&self, series: SeriesId) -> Option<&SeriesData> {
        self.series.get(&series).map(|s| &s.data)
    }

    pub fn is_time_axis_visible(&self, pane: PaneId) -> Option<bool> {
        self.panes.get(&pane).map(|p| p.time_axis_visible)
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl RangeSink for HeadlessSurface {
    fn set_visible_range(&mut self, pane: PaneId, range: VisibleRange) -> Result<(), SurfaceError> {
        let has_data = self
            .series
            .values()
            .any(|s| s.pane == pane && !s.data.is_empty());
        let state = self.panes.get_mut(&pane).ok_or(SurfaceError::UnknownPane(pane))?;
        if !has_data {
            return Err(SurfaceError::NotReady(pane));
        }
        state.range = Some(range);
        self.calls.push(SurfaceCall::SetVisibleRange(pane, range));
        if self.echo_programmatic {
            self.notify(pane, range, true);
        }
        Ok(())
    }
}

impl ChartSurface for HeadlessSurface {
    fn create_pane(&mut self, config: &PaneConfig) -> PaneId {
        let id = PaneId(self.next_id());
        self.panes.insert(
            id,
            PaneState {
                config: config.clone(),
                range: None,
                time_axis_visible: config.time_axis_visible,
            },
        );
        self.calls.push(SurfaceCall::CreatePane(id));
        id
    }

    fn destroy_pane(&mut self, pane: PaneId) {
        if self.panes.remove(&pane).is_some() {
            self.series.retain(|_, s| s.pane != pane);
            self.subscribers.retain(|(p, _)| *p != pane);
            self.calls.push(SurfaceCall::DestroyPane(pane));
        }
    }

    fn add_series(&mut self, pane: PaneId, config: &SeriesConfig) -> Result<SeriesId, SurfaceError> {
        if !self.panes.contains_key(&pane) {
            return Err(SurfaceError::UnknownPane(pane));
        }
        let id = SeriesId(self.next_id());
        self.series.insert(
            id,
            SeriesState {
                pane,
                config: config.clone(),
                data: SeriesData::Line(Vec::new()),
            },
        );
        self.calls.push(SurfaceCall::AddSeries(pane, id));
        Ok(id)
    }

    fn remove_series(&mut self, series: SeriesId) {
        if self.series.remove(&series).is_some() {
            self.calls.push(SurfaceCall::RemoveSeries(series));
        }
    }

    fn set_series_data(&mut self, series: SeriesId, data: SeriesData) -> Result<(), SurfaceError> {
        let state = self
            .series
            .get_mut(&series)
            .ok_or(SurfaceError::UnknownSeries(series))?;
        self.calls.push(SurfaceCall::SetSeriesData(series, data.len()));
        state.data = data;
        Ok(())
    }

    fn visible_range(&self, pane: PaneId) -> Option<VisibleRange> {
        self.panes.get(&pane).and_then(|p| p.range)
    }

    fn subscribe_visible_range_change(&mut self, pane: PaneId, callback: RangeCallback) {
        self.subscribers.push((pane, callback));
    }

    fn fit_content(&mut self, pane: PaneId) {
        let span = self
            .series
            .values()
            .filter(|s| s.pane == pane)
            .filter_map(|s| s.data.time_span())
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)));
        let (Some((from, to)), Some(state)) = (span, self.panes.get_mut(&pane)) else {
            return;
        };
        let range = VisibleRange::new(from, to);
        state.range = Some(range);
        self.calls.push(SurfaceCall::FitContent(pane));
        let everyone = self.echo_programmatic;
        self.notify(pane, range, everyone);
    }

    fn set_time_axis_visible(&mut self, pane: PaneId, visible: bool) {
        if let Some(state) = self.panes.get_mut(&pane) {
            state.time_axis_visible = visible;
        }
    }

    fn set_stack_index(&mut self, pane: PaneId, index: usize) {
        if let Some(state) = self.panes.get_mut(&pane) {
            state.config.stack_index = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PaneRole, SeriesStyle};
    use charter_core::{Color, DerivedPoint};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn pane_config() -> PaneConfig {
        PaneConfig {
            role: PaneRole::Panel,
            title: "test".to_string(),
            stack_index: 1,
            time_axis_visible: true,
            height: 100,
        }
    }

    fn line() -> SeriesConfig {
        SeriesConfig::new("line", SeriesStyle::Line { color: Color::rgb(1, 2, 3) })
    }

    #[test]
    fn test_range_requires_data() {
        let mut surface = HeadlessSurface::new();
        let pane = surface.create_pane(&pane_config());
        let series = surface.add_series(pane, &line()).unwrap();

        let range = VisibleRange::new(0, 10);
        assert_eq!(surface.set_visible_range(pane, range), Err(SurfaceError::NotReady(pane)));

        surface
            .set_series_data(series, SeriesData::Line(vec![DerivedPoint::new(0, 1.0)]))
            .unwrap();
        assert!(surface.set_visible_range(pane, range).is_ok());
        assert_eq!(surface.visible_range(pane), Some(range));
        assert_eq!(
            surface.set_visible_range(PaneId(999), range),
            Err(SurfaceError::UnknownPane(PaneId(999)))
        );
    }

    #[test]
    fn test_destroy_pane_drops_its_series() {
        let mut surface = HeadlessSurface::new();
        let pane = surface.create_pane(&pane_config());
        let series = surface.add_series(pane, &line()).unwrap();

        surface.destroy_pane(pane);
        assert!(surface.series(series).is_none());
        assert_eq!(surface.pane_count(), 0);
        assert_eq!(
            surface.set_series_data(series, SeriesData::Line(Vec::new())),
            Err(SurfaceError::UnknownSeries(series))
        );
    }

    #[test]
    fn test_user_navigation_notifies_only_that_pane() {
        let mut surface = HeadlessSurface::new();
        let a = surface.create_pane(&pane_config());
        let b = surface.create_pane(&pane_config());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        surface.subscribe_visible_range_change(a, Box::new(move |r| sink.borrow_mut().push(r)));

        surface.user_set_visible_range(b, VisibleRange::new(1, 2));
        assert!(seen.borrow().is_empty());

        surface.user_set_visible_range(a, VisibleRange::new(3, 4));
        assert_eq!(*seen.borrow(), vec![VisibleRange::new(3, 4)]);
    }

    #[test]
    fn test_fit_content_spans_all_series() {
        let mut surface = HeadlessSurface::new();
        let pane = surface.create_pane(&pane_config());
        let s1 = surface.add_series(pane, &line()).unwrap();
        let s2 = surface.add_series(pane, &line()).unwrap();
        surface
            .set_series_data(s1, SeriesData::Line(vec![DerivedPoint::new(10, 1.0), DerivedPoint::new(20, 1.0)]))
            .unwrap();
        surface
            .set_series_data(s2, SeriesData::Line(vec![DerivedPoint::new(5, 1.0), DerivedPoint::new(15, 1.0)]))
            .unwrap();

        surface.fit_content(pane);
        assert_eq!(surface.visible_range(pane), Some(VisibleRange::new(5, 20)));
    }
}
