//! Pane coordination: which surface resources back each indicator.
//!
//! Overlay indicators (SMA, EMA, VWAP) are extra line series on the main
//! candlestick pane. Panel indicators (volume, RSI, MACD) each get their own
//! pane stacked below it, in registry order. The coordinator keeps an arena
//! from indicator id to the handles it created and reconciles it against the
//! registry on every change.

use std::collections::HashMap;

use charter_config::{PaneLayout, SeriesColors};
use charter_core::{Candle, Color};
use charter_indicators::{IndicatorEngine, IndicatorKind, IndicatorOutput};

use crate::indicators::{IndicatorId, IndicatorInstance, IndicatorRegistry};
use crate::surface::{
    ChartSurface, PaneConfig, PaneId, PaneRole, SeriesConfig, SeriesData, SeriesId, SeriesStyle, SurfaceError,
};
use crate::sync::{RangeChannel, RangeFollower};

/// Surface handles owned on behalf of one indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// A line on the main pane.
    Overlay { series: SeriesId },
    /// A dedicated pane. MACD panels hold histogram, MACD line and signal line.
    Panel { pane: PaneId, series: Vec<SeriesId> },
}

impl Resource {
    pub fn pane(&self, main: PaneId) -> PaneId {
        match self {
            Resource::Overlay { .. } => main,
            Resource::Panel { pane, .. } => *pane,
        }
    }

    pub fn series(&self) -> Vec<SeriesId> {
        match self {
            Resource::Overlay { series } => vec![*series],
            Resource::Panel { series, .. } => series.clone(),
        }
    }
}

/// Keeps the surface's panes and series in step with the indicator registry.
pub struct PaneCoordinator {
    main_pane: PaneId,
    candle_series: SeriesId,
    resources: Vec<(IndicatorId, Resource)>,
    engine: IndicatorEngine,
    colors: SeriesColors,
    layout: PaneLayout,
    channel: RangeChannel,
}

impl PaneCoordinator {
    /// Create the main pane and its candlestick series, and subscribe to its
    /// navigation. Panel panes are never subscribed.
    pub fn new<S: ChartSurface>(
        surface: &mut S,
        engine: IndicatorEngine,
        colors: SeriesColors,
        layout: PaneLayout,
    ) -> Result<Self, SurfaceError> {
        let main_pane = surface.create_pane(&PaneConfig {
            role: PaneRole::Main,
            title: "Price".to_string(),
            stack_index: 0,
            time_axis_visible: true,
            height: layout.main_height,
        });
        let candle_series = surface.add_series(
            main_pane,
            &SeriesConfig::new(
                "Candles",
                SeriesStyle::Candlestick {
                    up: colors.candle_up,
                    down: colors.candle_down,
                },
            ),
        )?;

        let channel = RangeChannel::new();
        let publisher = channel.publisher();
        surface.subscribe_visible_range_change(
            main_pane,
            Box::new(move |range| {
                publisher.publish(range);
            }),
        );

        Ok(Self {
            main_pane,
            candle_series,
            resources: Vec::new(),
            engine,
            colors,
            layout,
            channel,
        })
    }

    pub fn main_pane(&self) -> PaneId {
        self.main_pane
    }

    pub fn candle_series(&self) -> SeriesId {
        self.candle_series
    }

    pub fn engine(&self) -> &IndicatorEngine {
        &self.engine
    }

    pub fn channel(&self) -> &RangeChannel {
        &self.channel
    }

    pub fn resource(&self, id: &IndicatorId) -> Option<&Resource> {
        self.resources.iter().find(|(rid, _)| rid == id).map(|(_, r)| r)
    }

    /// Pane an indicator is drawn on: the main pane for overlays.
    pub fn pane_of(&self, id: &IndicatorId) -> Option<PaneId> {
        self.resource(id).map(|r| r.pane(self.main_pane))
    }

    pub fn series_of(&self, id: &IndicatorId) -> Vec<SeriesId> {
        self.resource(id).map(Resource::series).unwrap_or_default()
    }

    /// Panel panes, top to bottom.
    pub fn panel_panes(&self) -> Vec<PaneId> {
        self.resources
            .iter()
            .filter_map(|(_, r)| match r {
                Resource::Panel { pane, .. } => Some(*pane),
                Resource::Overlay { .. } => None,
            })
            .collect()
    }

    /// The pane that shows time-axis labels.
    pub fn bottom_pane(&self) -> PaneId {
        self.panel_panes().last().copied().unwrap_or(self.main_pane)
    }

    /// Replace the candlestick series data.
    pub fn push_candles<S: ChartSurface>(&self, surface: &mut S, candles: &[Candle]) {
        push(surface, self.candle_series, SeriesData::Candles(candles.to_vec()));
    }

    /// Bring surface resources in line with the registry and recompute every
    /// indicator from `candles`.
    ///
    /// Resources of removed indicators are destroyed before any new ones are
    /// created. New panels start at the main pane's visible range, and panels
    /// are restacked so their indices stay contiguous.
    pub fn reconcile<S: ChartSurface>(&mut self, surface: &mut S, registry: &IndicatorRegistry, candles: &[Candle]) {
        let previous = std::mem::take(&mut self.resources);
        let (kept, stale): (Vec<_>, Vec<_>) = previous.into_iter().partition(|(id, _)| registry.contains(id));

        for (id, resource) in stale {
            self.destroy(surface, &id, resource);
        }

        let mut kept: HashMap<IndicatorId, Resource> = kept.into_iter().collect();
        let mut resources = Vec::with_capacity(registry.len());
        let mut new_panels = Vec::new();
        let mut panel_count = 0;

        for instance in registry.iter() {
            let resource = match kept.remove(&instance.id) {
                Some(resource) => resource,
                None => match self.create(surface, instance, panel_count + 1) {
                    Some(resource) => {
                        if let Resource::Panel { pane, .. } = resource {
                            new_panels.push(pane);
                        }
                        resource
                    }
                    None => continue,
                },
            };
            if matches!(resource, Resource::Panel { .. }) {
                panel_count += 1;
            }

            let output = self.engine.compute(&instance.spec, candles);
            push_output(surface, &resource, output);
            resources.push((instance.id.clone(), resource));
        }
        self.resources = resources;

        // Panels that rejected an earlier copy (no data yet) are retried here.
        let waiting: Vec<RangeFollower> = self
            .panel_panes()
            .into_iter()
            .filter(|pane| new_panels.contains(pane) || surface.visible_range(*pane).is_none())
            .map(RangeFollower::new)
            .collect();
        if !waiting.is_empty() {
            if let Some(range) = surface.visible_range(self.main_pane) {
                self.channel.broadcast(surface, &waiting, range);
            }
        }

        self.update_layout(surface);
    }

    /// Broadcast the latest main-pane navigation to every panel.
    ///
    /// Returns true if there was anything to broadcast.
    pub fn process_navigation<S: ChartSurface>(&self, surface: &mut S) -> bool {
        let Some(range) = self.channel.take_pending() else {
            return false;
        };
        let followers = self.followers();
        let applied = self.channel.broadcast(surface, &followers, range);
        log::debug!("Synced {}/{} panels to {:?}", applied, followers.len(), range);
        true
    }

    /// Fit the main pane to its data and align every panel with the result.
    pub fn fit_content<S: ChartSurface>(&self, surface: &mut S) {
        surface.fit_content(self.main_pane);
        // The fit may already have been published; the resulting range is what counts.
        self.channel.take_pending();
        if let Some(range) = surface.visible_range(self.main_pane) {
            self.channel.broadcast(surface, &self.followers(), range);
        }
    }

    fn followers(&self) -> Vec<RangeFollower> {
        self.panel_panes().into_iter().map(RangeFollower::new).collect()
    }

    fn create<S: ChartSurface>(
        &self,
        surface: &mut S,
        instance: &IndicatorInstance,
        stack_index: usize,
    ) -> Option<Resource> {
        let label = self.engine.label(&instance.spec);
        let line_color = instance.color.unwrap_or(self.colors.macd_line);

        if instance.spec.kind.is_overlay() {
            let config = SeriesConfig::new(label, SeriesStyle::Line { color: line_color });
            let series = add_series(surface, self.main_pane, &config)?;
            log::debug!("Created overlay {} for {}", series.0, instance.id);
            return Some(Resource::Overlay { series });
        }

        let pane = surface.create_pane(&PaneConfig {
            role: PaneRole::Panel,
            title: label.clone(),
            stack_index,
            time_axis_visible: false,
            height: self.layout.panel_height,
        });
        let configs = self.panel_series(instance.spec.kind, &label, line_color);
        let series = configs
            .iter()
            .filter_map(|config| add_series(surface, pane, config))
            .collect();
        log::debug!("Created panel {} for {}", pane.0, instance.id);
        Some(Resource::Panel { pane, series })
    }

    fn panel_series(&self, kind: IndicatorKind, label: &str, line_color: Color) -> Vec<SeriesConfig> {
        match kind {
            IndicatorKind::Volume => vec![SeriesConfig::new(
                label,
                SeriesStyle::Histogram {
                    positive: self.colors.volume_up,
                    negative: self.colors.volume_down,
                },
            )],
            IndicatorKind::Macd => vec![
                SeriesConfig::new(
                    "Histogram",
                    SeriesStyle::Histogram {
                        positive: self.colors.histogram_positive,
                        negative: self.colors.histogram_negative,
                    },
                ),
                SeriesConfig::new(
                    "MACD",
                    SeriesStyle::Line {
                        color: self.colors.macd_line,
                    },
                ),
                SeriesConfig::new(
                    "Signal",
                    SeriesStyle::Line {
                        color: self.colors.macd_signal,
                    },
                ),
            ],
            _ => vec![SeriesConfig::new(label, SeriesStyle::Line { color: line_color })],
        }
    }

    fn destroy<S: ChartSurface>(&self, surface: &mut S, id: &IndicatorId, resource: Resource) {
        match resource {
            Resource::Overlay { series } => surface.remove_series(series),
            Resource::Panel { pane, .. } => surface.destroy_pane(pane),
        }
        log::debug!("Destroyed resources of {}", id);
    }

    fn update_layout<S: ChartSurface>(&self, surface: &mut S) {
        let bottom = self.bottom_pane();
        surface.set_time_axis_visible(self.main_pane, self.main_pane == bottom);
        for (i, pane) in self.panel_panes().into_iter().enumerate() {
            surface.set_stack_index(pane, i + 1);
            surface.set_time_axis_visible(pane, pane == bottom);
        }
    }
}

fn add_series<S: ChartSurface>(surface: &mut S, pane: PaneId, config: &SeriesConfig) -> Option<SeriesId> {
    match surface.add_series(pane, config) {
        Ok(series) => Some(series),
        Err(e) => {
            log::warn!("Failed to add series {:?}: {}", config.title, e);
            None
        }
    }
}

fn push<S: ChartSurface>(surface: &mut S, series: SeriesId, data: SeriesData) {
    if let Err(e) = surface.set_series_data(series, data) {
        log::warn!("Failed to push data to series {}: {}", series.0, e);
    }
}

fn push_output<S: ChartSurface>(surface: &mut S, resource: &Resource, output: IndicatorOutput) {
    let series = resource.series();
    let data = match output {
        IndicatorOutput::Line(points) => vec![SeriesData::Line(points)],
        IndicatorOutput::Oscillator { values, .. } => vec![SeriesData::Line(values)],
        IndicatorOutput::Histogram(points) => vec![SeriesData::Histogram(points)],
        IndicatorOutput::Macd(lines) => vec![
            SeriesData::Histogram(lines.histogram),
            SeriesData::Line(lines.macd_line),
            SeriesData::Line(lines.signal_line),
        ],
    };
    for (series, data) in series.into_iter().zip(data) {
        push(surface, series, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{HeadlessSurface, SurfaceCall};
    use charter_indicators::IndicatorSpec;

    fn candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.7).sin() * 5.0;
                Candle::new(i as i64 * 60, close, close + 1.0, close - 1.0, close, Some(1000.0))
            })
            .collect()
    }

    fn setup() -> (HeadlessSurface, PaneCoordinator, IndicatorRegistry) {
        let mut surface = HeadlessSurface::new();
        let coordinator = PaneCoordinator::new(
            &mut surface,
            IndicatorEngine::default(),
            SeriesColors::default(),
            PaneLayout::default(),
        )
        .unwrap();
        (surface, coordinator, IndicatorRegistry::default())
    }

    #[test]
    fn test_overlays_share_main_pane() {
        let (mut surface, mut coordinator, mut registry) = setup();
        let data = candles(60);
        let sma = registry.add(IndicatorSpec::sma(10));
        let vwap = registry.add(IndicatorSpec::vwap());

        coordinator.reconcile(&mut surface, &registry, &data);

        assert_eq!(surface.pane_count(), 1);
        assert_eq!(coordinator.pane_of(&sma), Some(coordinator.main_pane()));
        assert_eq!(coordinator.pane_of(&vwap), Some(coordinator.main_pane()));
        let sma_series = coordinator.series_of(&sma)[0];
        assert_eq!(surface.series_data(sma_series).unwrap().len(), 51);
    }

    #[test]
    fn test_macd_panel_has_three_series() {
        let (mut surface, mut coordinator, mut registry) = setup();
        let macd = registry.add(IndicatorSpec::macd());

        coordinator.reconcile(&mut surface, &registry, &candles(60));

        let pane = coordinator.pane_of(&macd).unwrap();
        assert_ne!(pane, coordinator.main_pane());
        assert_eq!(surface.series_on(pane).len(), 3);
        let series = coordinator.series_of(&macd);
        let histogram = surface.series_data(series[0]).unwrap();
        let signal = surface.series_data(series[2]).unwrap();
        assert!(matches!(histogram, SeriesData::Histogram(_)));
        assert_eq!(histogram.len(), signal.len());
    }

    #[test]
    fn test_destroy_before_create() {
        let (mut surface, mut coordinator, mut registry) = setup();
        let data = candles(40);
        let rsi = registry.add(IndicatorSpec::rsi(None));
        coordinator.reconcile(&mut surface, &registry, &data);
        let old_pane = coordinator.pane_of(&rsi).unwrap();

        registry.remove(&rsi);
        registry.add(IndicatorSpec::volume());
        surface.clear_calls();
        coordinator.reconcile(&mut surface, &registry, &data);

        let calls = surface.calls();
        let destroyed = calls
            .iter()
            .position(|c| *c == SurfaceCall::DestroyPane(old_pane))
            .unwrap();
        let created = calls
            .iter()
            .position(|c| matches!(c, SurfaceCall::CreatePane(_)))
            .unwrap();
        assert!(destroyed < created);
        assert_eq!(surface.pane_count(), 2);
    }

    #[test]
    fn test_only_bottom_pane_shows_time_axis() {
        let (mut surface, mut coordinator, mut registry) = setup();
        let data = candles(40);
        coordinator.reconcile(&mut surface, &registry, &data);
        assert_eq!(surface.is_time_axis_visible(coordinator.main_pane()), Some(true));

        registry.add(IndicatorSpec::volume());
        let rsi = registry.add(IndicatorSpec::rsi(None));
        coordinator.reconcile(&mut surface, &registry, &data);

        let bottom = coordinator.pane_of(&rsi).unwrap();
        assert_eq!(coordinator.bottom_pane(), bottom);
        for pane in surface.pane_ids() {
            assert_eq!(surface.is_time_axis_visible(pane), Some(pane == bottom));
        }

        registry.remove(&rsi);
        coordinator.reconcile(&mut surface, &registry, &data);
        let volume_pane = coordinator.panel_panes()[0];
        assert_eq!(surface.is_time_axis_visible(volume_pane), Some(true));
        assert_eq!(surface.is_time_axis_visible(coordinator.main_pane()), Some(false));
    }

    #[test]
    fn test_new_panel_copies_main_range() {
        let (mut surface, mut coordinator, mut registry) = setup();
        let data = candles(60);
        coordinator.push_candles(&mut surface, &data);
        let range = crate::surface::VisibleRange::new(600, 1800);
        surface.user_set_visible_range(coordinator.main_pane(), range);

        let volume = registry.add(IndicatorSpec::volume());
        coordinator.reconcile(&mut surface, &registry, &data);

        let pane = coordinator.pane_of(&volume).unwrap();
        assert_eq!(surface.visible_range(pane), Some(range));
    }

    #[test]
    fn test_panel_without_data_gets_main_range_later() {
        let (mut surface, mut coordinator, mut registry) = setup();
        let short = candles(10);
        coordinator.push_candles(&mut surface, &short);
        let range = crate::surface::VisibleRange::new(120, 480);
        surface.user_set_visible_range(coordinator.main_pane(), range);

        let rsi = registry.add(IndicatorSpec::rsi(None));
        coordinator.reconcile(&mut surface, &registry, &short);
        let pane = coordinator.pane_of(&rsi).unwrap();
        assert_eq!(surface.visible_range(pane), None);

        let data = candles(40);
        coordinator.push_candles(&mut surface, &data);
        coordinator.reconcile(&mut surface, &registry, &data);
        assert_eq!(surface.visible_range(pane), Some(range));
    }

    #[test]
    fn test_panels_restack_after_middle_removal() {
        let (mut surface, mut coordinator, mut registry) = setup();
        let data = candles(60);
        let volume = registry.add(IndicatorSpec::volume());
        let rsi = registry.add(IndicatorSpec::rsi(None));
        let macd = registry.add(IndicatorSpec::macd());
        coordinator.reconcile(&mut surface, &registry, &data);

        fn stack_index(surface: &HeadlessSurface, coordinator: &PaneCoordinator, id: &IndicatorId) -> usize {
            let pane = coordinator.pane_of(id).unwrap();
            surface.pane(pane).unwrap().config.stack_index
        }
        assert_eq!(stack_index(&surface, &coordinator, &macd), 3);

        registry.remove(&rsi);
        coordinator.reconcile(&mut surface, &registry, &data);
        assert_eq!(stack_index(&surface, &coordinator, &volume), 1);
        assert_eq!(stack_index(&surface, &coordinator, &macd), 2);
        assert_eq!(surface.pane(coordinator.main_pane()).unwrap().config.stack_index, 0);
    }

    #[test]
    fn test_existing_resources_survive_recompute() {
        let (mut surface, mut coordinator, mut registry) = setup();
        let ema = registry.add(IndicatorSpec::ema(5));
        let rsi = registry.add(IndicatorSpec::rsi(Some(5)));
        coordinator.reconcile(&mut surface, &registry, &candles(30));
        let before = (coordinator.series_of(&ema), coordinator.pane_of(&rsi));

        coordinator.reconcile(&mut surface, &registry, &candles(50));

        assert_eq!((coordinator.series_of(&ema), coordinator.pane_of(&rsi)), before);
        let ema_series = coordinator.series_of(&ema)[0];
        assert_eq!(surface.series_data(ema_series).unwrap().len(), 46);
    }
}
