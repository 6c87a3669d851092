//! Registry of active indicator instances.
//!
//! The registry owns every active indicator and the palette allocator. Adding
//! an indicator hands out a fresh id and, for palette kinds, a color; removing
//! one gives the color back. Iteration follows insertion order, which is also
//! the order panel panes are stacked in.

use std::fmt;

use charter_core::Color;
use charter_indicators::IndicatorSpec;

use crate::colors::ColorAllocator;

/// Unique identifier of an indicator instance, e.g. `sma-3`.
///
/// Ids are never reused within a registry, even after removal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndicatorId(String);

impl IndicatorId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single active indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorInstance {
    pub id: IndicatorId,
    pub spec: IndicatorSpec,
    /// Palette color, or `None` for kinds drawn with fixed colors.
    pub color: Option<Color>,
}

/// Insertion-ordered set of active indicators.
#[derive(Debug, Clone, Default)]
pub struct IndicatorRegistry {
    instances: Vec<IndicatorInstance>,
    next_id: u64,
    colors: ColorAllocator,
}

impl IndicatorRegistry {
    /// Create an empty registry drawing colors from `colors`.
    #[must_use]
    pub fn new(colors: ColorAllocator) -> Self {
        Self {
            instances: Vec::new(),
            next_id: 0,
            colors,
        }
    }

    /// Register a new indicator and return its id.
    ///
    /// Palette kinds acquire a color here. `spec` is assumed to be valid;
    /// period checks happen at the session boundary.
    pub fn add(&mut self, spec: IndicatorSpec) -> IndicatorId {
        self.next_id += 1;
        let id = IndicatorId(format!("{}-{}", spec.kind, self.next_id));
        let color = spec.kind.uses_palette().then(|| self.colors.acquire());

        log::debug!("Registered {} as {}", spec.label(), id);
        self.instances.push(IndicatorInstance {
            id: id.clone(),
            spec,
            color,
        });
        id
    }

    /// Remove an indicator by id, releasing its color.
    ///
    /// Returns the removed instance, or `None` if the id is unknown.
    pub fn remove(&mut self, id: &IndicatorId) -> Option<IndicatorInstance> {
        let pos = self.index_of(id)?;
        let instance = self.instances.remove(pos);
        if let Some(color) = instance.color {
            self.colors.release(color);
        }
        log::debug!("Removed {}", instance.id);
        Some(instance)
    }

    pub fn get(&self, id: &IndicatorId) -> Option<&IndicatorInstance> {
        self.instances.iter().find(|i| &i.id == id)
    }

    pub fn contains(&self, id: &IndicatorId) -> bool {
        self.index_of(id).is_some()
    }

    /// Position of an instance in insertion order.
    pub fn index_of(&self, id: &IndicatorId) -> Option<usize> {
        self.instances.iter().position(|i| &i.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorInstance> {
        self.instances.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn colors(&self) -> &ColorAllocator {
        &self.colors
    }
}
