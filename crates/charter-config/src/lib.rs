//! Configuration management for charter.
//!
//! Loads configuration from TOML files: the indicator color palette, fixed
//! series colors, indicator defaults and pane layout.

use charter_core::{Color, Timeframe};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Minimum number of distinct palette colors.
pub const MIN_PALETTE_SIZE: usize = 10;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub palette: PaletteConfig,
    pub indicators: IndicatorDefaults,
    pub colors: SeriesColors,
    pub panes: PaneLayout,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./config.toml`
    /// 2. `~/.config/charter/config.toml`
    ///
    /// Returns default config if no usable file is found.
    pub fn load_default() -> Self {
        // Try current directory first
        match Self::load(Self::default_path()) {
            Ok(config) => return config,
            Err(ConfigError::ReadError(_)) => {}
            Err(e) => log::warn!("Ignoring ./config.toml: {}", e),
        }

        // Try user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("charter").join("config.toml");
            match Self::load(&config_path) {
                Ok(config) => return config,
                Err(ConfigError::ReadError(_)) => {}
                Err(e) => log::warn!("Ignoring {}: {}", config_path.display(), e),
            }
        }

        // Return defaults
        Self::default()
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Check the invariants the chart core relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let palette = &self.palette.colors;
        if palette.len() < MIN_PALETTE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "palette needs at least {} colors, got {}",
                MIN_PALETTE_SIZE,
                palette.len()
            )));
        }
        for (i, color) in palette.iter().enumerate() {
            if palette[..i].contains(color) {
                return Err(ConfigError::Invalid(format!("palette color {color} is repeated")));
            }
        }

        let ind = &self.indicators;
        if ind.rsi_period == 0 || ind.macd_fast == 0 || ind.macd_slow == 0 || ind.macd_signal == 0 {
            return Err(ConfigError::Invalid("indicator periods must be positive".to_string()));
        }
        if ind.macd_fast >= ind.macd_slow {
            return Err(ConfigError::Invalid(format!(
                "macd_fast ({}) must be below macd_slow ({})",
                ind.macd_fast, ind.macd_slow
            )));
        }
        Ok(())
    }
}

/// General application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Ticker symbol to load on startup.
    pub default_symbol: String,
    /// Timeframe to load on startup.
    pub default_timeframe: Timeframe,
    /// Number of days of history requested per load.
    pub history_days: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_symbol: "AAPL".to_string(),
            default_timeframe: Timeframe::Day1,
            history_days: 90,
        }
    }
}

/// Palette handed out to line indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub colors: Vec<Color>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: vec![
                Color::rgb(0x29, 0x62, 0xff), // blue
                Color::rgb(0xff, 0x98, 0x00), // orange
                Color::rgb(0xe9, 0x1e, 0x63), // pink
                Color::rgb(0x00, 0xbc, 0xd4), // cyan
                Color::rgb(0xab, 0x47, 0xbc), // purple
                Color::rgb(0xcd, 0xdc, 0x39), // lime
                Color::rgb(0xff, 0xeb, 0x3b), // yellow
                Color::rgb(0x8d, 0x6e, 0x63), // brown
                Color::rgb(0x26, 0xa6, 0x9a), // teal
                Color::rgb(0xf4, 0x43, 0x36), // red
            ],
        }
    }
}

/// Indicator parameters that are not chosen per instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorDefaults {
    pub rsi_period: usize,
    pub rsi_upper_bound: f64,
    pub rsi_lower_bound: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorDefaults {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_upper_bound: 70.0,
            rsi_lower_bound: 30.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

/// Fixed colors for series that do not draw from the palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesColors {
    pub candle_up: Color,
    pub candle_down: Color,
    pub macd_line: Color,
    pub macd_signal: Color,
    pub histogram_positive: Color,
    pub histogram_negative: Color,
    pub volume_up: Color,
    pub volume_down: Color,
}

impl Default for SeriesColors {
    fn default() -> Self {
        Self {
            candle_up: Color::rgb(0x22, 0xc5, 0x5e),
            candle_down: Color::rgb(0xef, 0x44, 0x44),
            macd_line: Color::rgb(0x33, 0x99, 0xff),
            macd_signal: Color::rgb(0xff, 0x80, 0x33),
            histogram_positive: Color::rgb(0x33, 0xcc, 0x66),
            histogram_negative: Color::rgb(0xcc, 0x33, 0x33),
            volume_up: Color::rgb(0x26, 0xa6, 0x9a),
            volume_down: Color::rgb(0xef, 0x53, 0x50),
        }
    }
}

/// Pane sizing, in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneLayout {
    pub main_height: u32,
    pub panel_height: u32,
}

impl Default for PaneLayout {
    fn default() -> Self {
        Self {
            main_height: 520,
            panel_height: 140,
        }
    }
}
