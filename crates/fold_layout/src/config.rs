//! Carousel configuration
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! item_spacing_dp = 40.0
//! density = 2.75
//! min_snap_duration_ms = 200
//! max_snap_duration_ms = 600
//! snap_easing = "linear"
//! ```

use std::fs;
use std::path::Path;

use fold_animation::Easing;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::snap::SnapTiming;

/// Configuration for carousel spacing and snap behavior
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Gap between adjacent items in density-independent units
    pub item_spacing_dp: f32,
    /// Pixels per density-independent unit
    pub density: f32,
    /// Snap duration for a zero-distance correction (ms)
    pub min_snap_duration_ms: u32,
    /// Snap duration for exactly one cell of travel (ms)
    pub max_snap_duration_ms: u32,
    /// Offset the rewind animation starts from, at most
    pub rewind_distance: i64,
    /// Duration of the rewind-to-first animation (ms)
    pub rewind_duration_ms: u32,
    /// Curve applied to snap animations
    pub snap_easing: Easing,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl CarouselConfig {
    /// Standard configuration: 40dp gaps, 200-600ms linear snapping.
    pub fn standard() -> Self {
        Self {
            item_spacing_dp: 40.0,
            density: 1.0,
            min_snap_duration_ms: 200,
            max_snap_duration_ms: 600,
            rewind_distance: 1200,
            rewind_duration_ms: 300,
            snap_easing: Easing::Linear,
        }
    }

    /// Tight layout with quick snaps, for dense screens.
    pub fn compact() -> Self {
        Self {
            item_spacing_dp: 16.0,
            min_snap_duration_ms: 120,
            max_snap_duration_ms: 360,
            ..Self::standard()
        }
    }

    /// Set the item spacing in density-independent units.
    pub fn with_item_spacing_dp(mut self, dp: f32) -> Self {
        self.item_spacing_dp = dp;
        self
    }

    /// Set the display density.
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    /// Set the snap duration range.
    pub fn with_snap_durations(mut self, min_ms: u32, max_ms: u32) -> Self {
        self.min_snap_duration_ms = min_ms;
        self.max_snap_duration_ms = max_ms;
        self
    }

    /// Set the snap easing curve.
    pub fn with_snap_easing(mut self, easing: Easing) -> Self {
        self.snap_easing = easing;
        self
    }

    /// Item spacing resolved to whole pixels (truncated).
    pub fn item_spacing_px(&self) -> i32 {
        (self.item_spacing_dp * self.density) as i32
    }

    /// Snap duration range as used by the snap controller.
    pub fn snap_timing(&self) -> SnapTiming {
        SnapTiming {
            min_ms: self.min_snap_duration_ms,
            max_ms: self.max_snap_duration_ms,
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.density > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        if self.item_spacing_dp < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "item_spacing_dp must not be negative, got {}",
                self.item_spacing_dp
            )));
        }
        if self.min_snap_duration_ms > self.max_snap_duration_ms {
            return Err(ConfigError::Invalid(format!(
                "min_snap_duration_ms ({}) exceeds max_snap_duration_ms ({})",
                self.min_snap_duration_ms, self.max_snap_duration_ms
            )));
        }
        if self.rewind_distance < 0 {
            return Err(ConfigError::Invalid(format!(
                "rewind_distance must not be negative, got {}",
                self.rewind_distance
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CarouselConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded carousel config");
        Ok(config)
    }
}
