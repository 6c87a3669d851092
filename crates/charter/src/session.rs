//! The chart session: candles, indicators and panes behind one boundary.

use charter_config::Config;
use charter_core::{Candle, CandleStore, Color, Readout, SeriesKey};
use charter_indicators::{EngineSettings, IndicatorEngine, IndicatorKind, IndicatorSpec, MacdConfig};

use crate::colors::ColorAllocator;
use crate::error::ChartError;
use crate::indicators::{IndicatorId, IndicatorRegistry};
use crate::panes::PaneCoordinator;
use crate::surface::{ChartSurface, PaneId, SeriesId};

/// Notified once with the color given to each newly added palette indicator.
pub type ColorAssignedCallback = Box<dyn FnMut(&IndicatorId, Color)>;

/// Engine parameters taken from the `[indicators]` config section.
pub fn engine_settings_from(config: &Config) -> EngineSettings {
    let defaults = &config.indicators;
    EngineSettings {
        macd: MacdConfig {
            fast_period: defaults.macd_fast,
            slow_period: defaults.macd_slow,
            signal_period: defaults.macd_signal,
            ..MacdConfig::default()
        },
        rsi_upper_bound: defaults.rsi_upper_bound,
        rsi_lower_bound: defaults.rsi_lower_bound,
    }
}

/// One chart: a candle sequence, its active indicators and the surface
/// drawing them.
///
/// Every mutation recomputes derived series from the full candle sequence and
/// reconciles the surface before returning. Navigation on the main pane is
/// queued by the surface callback and forwarded to panels by
/// [`ChartSession::process_navigation`].
pub struct ChartSession<S: ChartSurface> {
    surface: S,
    store: CandleStore,
    registry: IndicatorRegistry,
    coordinator: PaneCoordinator,
    key: Option<SeriesKey>,
    rsi_period: usize,
    on_color_assigned: Option<ColorAssignedCallback>,
}

impl<S: ChartSurface> ChartSession<S> {
    /// Set up the main pane on `surface` using `config`.
    pub fn new(mut surface: S, config: &Config) -> Result<Self, ChartError> {
        let engine = IndicatorEngine::new(engine_settings_from(config));
        let coordinator = PaneCoordinator::new(&mut surface, engine, config.colors.clone(), config.panes.clone())?;
        let registry = IndicatorRegistry::new(ColorAllocator::new(config.palette.colors.clone()));

        Ok(Self {
            surface,
            store: CandleStore::new(),
            registry,
            coordinator,
            key: None,
            rsi_period: config.indicators.rsi_period,
            on_color_assigned: None,
        })
    }

    pub fn set_on_color_assigned(&mut self, callback: ColorAssignedCallback) {
        self.on_color_assigned = Some(callback);
    }

    /// Replace the whole candle sequence and recompute everything.
    ///
    /// Invalid input leaves the previous candles and derived series untouched.
    /// The visible range is kept as is.
    pub fn replace_candles(&mut self, candles: Vec<Candle>) -> Result<(), ChartError> {
        if let Err(e) = self.store.replace(candles) {
            log::warn!("Rejected candle update: {}", e);
            return Err(e.into());
        }
        self.coordinator.push_candles(&mut self.surface, self.store.candles());
        self.refresh();
        Ok(())
    }

    /// Replace candles for `key`, fitting the view when the key changes.
    pub fn load_series(&mut self, key: SeriesKey, candles: Vec<Candle>) -> Result<(), ChartError> {
        self.replace_candles(candles)?;
        if self.key.as_ref() != Some(&key) {
            log::info!("Loaded {} ({} candles)", key, self.store.len());
            self.key = Some(key);
            self.request_fit_content();
        }
        Ok(())
    }

    /// Fit the main pane to its data once and align the panels with it.
    pub fn request_fit_content(&mut self) {
        self.coordinator.fit_content(&mut self.surface);
    }

    /// Add an indicator. `period` is validated here; the engine never sees
    /// a non-positive one.
    pub fn add_indicator(&mut self, kind: IndicatorKind, period: Option<i64>) -> Result<IndicatorId, ChartError> {
        let spec = self.validate(kind, period)?;
        let id = self.registry.add(spec);

        let color = self.registry.get(&id).and_then(|i| i.color);
        if let (Some(color), Some(callback)) = (color, self.on_color_assigned.as_mut()) {
            callback(&id, color);
        }

        self.refresh();
        log::info!("Added {} as {}", self.coordinator.engine().label(&spec), id);
        Ok(id)
    }

    /// Add an indicator from text such as `sma:20`, `rsi` or `rsi:7`.
    pub fn add_indicator_str(&mut self, text: &str) -> Result<IndicatorId, ChartError> {
        let (kind, period) = match text.split_once(':') {
            Some((kind, period)) => {
                let period = period.trim();
                let period: i64 = period
                    .parse()
                    .map_err(|_| ChartError::InvalidPeriodText(period.to_string()))?;
                (kind, Some(period))
            }
            None => (text, None),
        };
        self.add_indicator(kind.parse()?, period)
    }

    /// Remove an indicator and tear down its series or pane.
    pub fn remove_indicator(&mut self, id: &IndicatorId) -> Result<(), ChartError> {
        self.registry
            .remove(id)
            .ok_or_else(|| ChartError::UnknownIndicator(id.to_string()))?;
        self.refresh();
        Ok(())
    }

    /// Forward pending main-pane navigation to every panel.
    pub fn process_navigation(&mut self) -> bool {
        self.coordinator.process_navigation(&mut self.surface)
    }

    /// OHLC readout for the candle nearest to `time`.
    pub fn crosshair(&self, time: i64) -> Option<Readout> {
        self.store.readout(time)
    }

    fn validate(&self, kind: IndicatorKind, period: Option<i64>) -> Result<IndicatorSpec, ChartError> {
        let period = match period {
            Some(p) if p <= 0 => return Err(ChartError::InvalidPeriod { kind, period: p }),
            Some(_) if !kind.takes_period() => {
                log::debug!("Ignoring period for {}", kind);
                None
            }
            Some(p) => Some(usize::try_from(p).map_err(|_| ChartError::InvalidPeriod { kind, period: p })?),
            None => None,
        };

        match (kind, period) {
            (k, None) if k.requires_period() => Err(ChartError::MissingPeriod(k)),
            (IndicatorKind::Rsi, None) => Ok(IndicatorSpec::rsi(Some(self.rsi_period))),
            (k, p) => Ok(IndicatorSpec::new(k, p)),
        }
    }

    fn refresh(&mut self) {
        self.coordinator
            .reconcile(&mut self.surface, &self.registry, self.store.candles());
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn registry(&self) -> &IndicatorRegistry {
        &self.registry
    }

    pub fn coordinator(&self) -> &PaneCoordinator {
        &self.coordinator
    }

    pub fn candles(&self) -> &[Candle] {
        self.store.candles()
    }

    pub fn series_key(&self) -> Option<&SeriesKey> {
        self.key.as_ref()
    }

    pub fn main_pane(&self) -> PaneId {
        self.coordinator.main_pane()
    }

    pub fn pane_of(&self, id: &IndicatorId) -> Option<PaneId> {
        self.coordinator.pane_of(id)
    }

    pub fn series_of(&self, id: &IndicatorId) -> Vec<SeriesId> {
        self.coordinator.series_of(id)
    }

    pub fn color_of(&self, id: &IndicatorId) -> Option<Color> {
        self.registry.get(id).and_then(|i| i.color)
    }
}
