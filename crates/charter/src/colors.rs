//! Palette color allocation for line indicators.

use charter_config::PaletteConfig;
use charter_core::Color;

/// Hands out distinct palette colors in round-robin order.
///
/// `acquire` scans forward from a cursor for the first color nobody holds.
/// When every color is held it falls back to the color at the cursor, so two
/// indicators share a color only once the palette is exhausted. Holders are
/// counted per color; a shared color becomes free again only after its last
/// holder releases it. Neither operation fails.
#[derive(Debug, Clone)]
pub struct ColorAllocator {
    palette: Vec<Color>,
    holders: Vec<usize>,
    cursor: usize,
}

impl Default for ColorAllocator {
    fn default() -> Self {
        Self::new(PaletteConfig::default().colors)
    }
}

impl ColorAllocator {
    /// Create an allocator over `palette`. An empty palette falls back to the default one.
    pub fn new(palette: Vec<Color>) -> Self {
        let palette = if palette.is_empty() {
            log::warn!("Empty color palette, using the default palette");
            PaletteConfig::default().colors
        } else {
            palette
        };
        Self {
            holders: vec![0; palette.len()],
            palette,
            cursor: 0,
        }
    }

    /// Take the next free color, or reuse one if the palette is exhausted.
    pub fn acquire(&mut self) -> Color {
        let len = self.palette.len();
        for step in 0..len {
            let idx = (self.cursor + step) % len;
            if self.holders[idx] == 0 {
                self.holders[idx] = 1;
                self.cursor = (idx + 1) % len;
                return self.palette[idx];
            }
        }

        let idx = self.cursor;
        self.holders[idx] += 1;
        self.cursor = (idx + 1) % len;
        log::debug!("Color palette exhausted, reusing {}", self.palette[idx]);
        self.palette[idx]
    }

    /// Drop one holder of `color`. Unknown or already-free colors are ignored.
    pub fn release(&mut self, color: Color) {
        if let Some(idx) = self.palette.iter().position(|c| *c == color) {
            self.holders[idx] = self.holders[idx].saturating_sub(1);
        }
    }

    pub fn is_in_use(&self, color: Color) -> bool {
        self.palette
            .iter()
            .position(|c| *c == color)
            .is_some_and(|idx| self.holders[idx] > 0)
    }

    pub fn in_use_count(&self) -> usize {
        self.holders.iter().filter(|count| **count > 0).count()
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_until_exhausted() {
        let mut colors = ColorAllocator::default();
        let size = colors.palette().len();
        assert!(size >= 10);

        let taken: Vec<Color> = (0..size).map(|_| colors.acquire()).collect();
        for (i, color) in taken.iter().enumerate() {
            assert!(!taken[..i].contains(color), "{color} handed out twice");
        }
        assert_eq!(colors.in_use_count(), size);

        // Exhausted: falls back to reuse instead of failing.
        let extra = colors.acquire();
        assert!(taken.contains(&extra));
    }

    #[test]
    fn test_released_color_is_reused() {
        let mut colors = ColorAllocator::default();
        let taken: Vec<Color> = (0..colors.palette().len()).map(|_| colors.acquire()).collect();

        colors.release(taken[3]);
        assert!(!colors.is_in_use(taken[3]));
        assert_eq!(colors.acquire(), taken[3]);
    }

    #[test]
    fn test_round_robin_is_deterministic() {
        let mut a = ColorAllocator::default();
        let mut b = ColorAllocator::default();
        let first = a.acquire();
        a.release(first);
        b.acquire();
        b.release(first);

        // The cursor moved past the released color, so the next pick differs.
        let next = a.acquire();
        assert_ne!(next, first);
        assert_eq!(next, b.acquire());
    }

    #[test]
    fn test_shared_color_stays_held_until_last_release() {
        let mut colors = ColorAllocator::default();
        let size = colors.palette().len();
        let taken: Vec<Color> = (0..size + 2).map(|_| colors.acquire()).collect();
        // Exhausted: the first two colors now have two holders each.
        assert_eq!(taken[size], taken[0]);
        assert_eq!(taken[size + 1], taken[1]);

        colors.release(taken[0]);
        colors.release(taken[size + 1]);
        colors.release(taken[1]);
        assert!(colors.is_in_use(taken[0]));
        assert!(!colors.is_in_use(taken[1]));

        // The only unheld color is handed out, not the still-shared one.
        assert_eq!(colors.acquire(), taken[1]);
        assert_eq!(colors.in_use_count(), size);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut colors = ColorAllocator::default();
        let color = colors.acquire();
        colors.release(color);
        colors.release(color);
        colors.release(Color::rgb(1, 2, 3));
        assert_eq!(colors.in_use_count(), 0);
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let mut colors = ColorAllocator::new(Vec::new());
        assert_eq!(colors.palette().len(), PaletteConfig::default().colors.len());
        colors.acquire();
        assert_eq!(colors.in_use_count(), 1);
    }
}
