//! Analysis settings for the classification pipeline.
//!
//! This module provides serialization and deserialization of the tunable
//! analysis parameters, so a project can carry the exact settings its
//! entries were computed with.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BRIGHTNESS_THRESHOLD, DEFAULT_FIBER_OVERLAP_FRACTION, DEFAULT_FIBER_THRESHOLD,
};

/// Current settings format version.
/// Increment this when making breaking changes to the settings format.
pub const SETTINGS_VERSION: u32 = 1;

/// One channel of a decoded RGB raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChannelColor {
    /// Red channel (index 0).
    Red,
    /// Green channel (index 1).
    Green,
    /// Blue channel (index 2).
    #[default]
    Blue,
}

impl ChannelColor {
    /// Get the display name for this channel.
    pub fn name(&self) -> &'static str {
        match self {
            ChannelColor::Red => "Red",
            ChannelColor::Green => "Green",
            ChannelColor::Blue => "Blue",
        }
    }

    /// Index of this channel in a `(height, width, 3)` raster.
    pub fn index(&self) -> usize {
        match self {
            ChannelColor::Red => 0,
            ChannelColor::Green => 1,
            ChannelColor::Blue => 2,
        }
    }

    /// Get all channels in raster order.
    pub fn all() -> &'static [ChannelColor] {
        &[ChannelColor::Red, ChannelColor::Green, ChannelColor::Blue]
    }
}

/// Tunable parameters of the fiber/nucleus classification pipeline.
///
/// The defaults match the values the pipeline was calibrated with; every
/// field is configurable so alternative stains and exposures can be
/// accommodated without code changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Version of the settings format.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Channel holding the nuclei stain.
    #[serde(default)]
    pub nuclei_color: ChannelColor,

    /// Channel holding the fiber stain.
    #[serde(default = "default_fiber_color")]
    pub fiber_color: ChannelColor,

    /// Gray level above which a fiber-channel pixel is a fiber candidate.
    #[serde(default = "default_fiber_threshold")]
    pub fiber_threshold: u8,

    /// Mean gray level below which a detected nucleus is discarded, and
    /// above which an enclosed background hole is re-filled into the
    /// fiber mask.
    #[serde(default = "default_brightness_threshold")]
    pub brightness_threshold: u8,

    /// Fraction of a nucleus's pixels that must fall inside the fiber mask
    /// for an in-fiber classification. The boundary is inclusive.
    #[serde(default = "default_overlap_fraction")]
    pub fiber_overlap_fraction: f64,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_fiber_color() -> ChannelColor {
    ChannelColor::Green
}

fn default_fiber_threshold() -> u8 {
    DEFAULT_FIBER_THRESHOLD
}

fn default_brightness_threshold() -> u8 {
    DEFAULT_BRIGHTNESS_THRESHOLD
}

fn default_overlap_fraction() -> f64 {
    DEFAULT_FIBER_OVERLAP_FRACTION
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            nuclei_color: ChannelColor::Blue,
            fiber_color: ChannelColor::Green,
            fiber_threshold: DEFAULT_FIBER_THRESHOLD,
            brightness_threshold: DEFAULT_BRIGHTNESS_THRESHOLD,
            fiber_overlap_fraction: DEFAULT_FIBER_OVERLAP_FRACTION,
        }
    }
}

impl AnalysisSettings {
    /// Create settings with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fiber binarization threshold.
    pub fn with_fiber_threshold(mut self, threshold: u8) -> Self {
        self.fiber_threshold = threshold;
        self
    }

    /// Set the nucleus validity / hole re-fill brightness threshold.
    pub fn with_brightness_threshold(mut self, threshold: u8) -> Self {
        self.brightness_threshold = threshold;
        self
    }

    /// Set the in-fiber overlap fraction.
    pub fn with_overlap_fraction(mut self, fraction: f64) -> Self {
        self.fiber_overlap_fraction = fraction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AnalysisSettings::default();
        assert_eq!(settings.nuclei_color, ChannelColor::Blue);
        assert_eq!(settings.fiber_color, ChannelColor::Green);
        assert_eq!(settings.fiber_threshold, 25);
        assert_eq!(settings.brightness_threshold, 50);
        assert!((settings.fiber_overlap_fraction - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        // An old or hand-written settings blob without every field must
        // still deserialize.
        let settings: AnalysisSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, AnalysisSettings::default());

        let settings: AnalysisSettings =
            serde_json::from_str(r#"{"fiber_threshold": 40}"#).unwrap();
        assert_eq!(settings.fiber_threshold, 40);
        assert_eq!(settings.brightness_threshold, 50);
    }

    #[test]
    fn test_channel_index() {
        assert_eq!(ChannelColor::Red.index(), 0);
        assert_eq!(ChannelColor::Green.index(), 1);
        assert_eq!(ChannelColor::Blue.index(), 2);
    }
}
