// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings.
//!
//! Settings are stored as pretty-printed RON. Any field missing from the
//! file falls back to its default.

use keystage_timeline::TimelineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default settings file name
pub const SETTINGS_FILE_NAME: &str = "keystage.ron";

/// Settings load/save failures
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Gesture and transform tuning for the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Timeline tuning
    pub timeline: TimelineConfig,
    /// Offset applied to pasted objects
    pub paste_offset: [f32; 2],
    /// Minimum marquee width and height before it selects anything
    pub marquee_min_size: f32,
    /// Smallest box edge a resize can produce
    pub min_box_size: f32,
    /// Pointer pixels per unit of scale
    pub scale_sensitivity: f32,
    /// Scale range for scale-mode resizing
    pub scale_range: [f32; 2],
    /// Box assumed when resizing a keyframe that has none
    pub default_resize_box: [f32; 2],
    /// Playback ticks per second
    pub frame_rate: f32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            timeline: TimelineConfig::default(),
            paste_offset: [50.0, 50.0],
            marquee_min_size: 5.0,
            min_box_size: 20.0,
            scale_sensitivity: 50.0,
            scale_range: [0.1, 3.0],
            default_resize_box: [100.0, 60.0],
            frame_rate: 60.0,
        }
    }
}

impl EditorSettings {
    /// Delay between playback ticks
    pub fn frame_interval(&self) -> Duration {
        let fallback = Duration::from_micros(16_667);
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return fallback;
        }
        Duration::try_from_secs_f32(1.0 / self.frame_rate).unwrap_or(fallback)
    }

    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: EditorSettings = ron::from_str(&content)?;
        tracing::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, content)?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Load settings, or fall back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No settings at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }
}
