// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline tuning constants.

use serde::{Deserialize, Serialize};

/// Timeline defaults and auto-grow policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Duration of a new timeline, in seconds
    pub default_duration: f32,
    /// Upper bound for automatic duration growth
    pub max_auto_duration: f32,
    /// Headroom added past an appended keyframe's end when growing
    pub duration_padding: f32,
    /// Fade-in length for objects that appear partway through
    pub fade_in_duration: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            default_duration: 15.0,
            max_auto_duration: 30.0,
            duration_padding: 2.0,
            fade_in_duration: 0.5,
        }
    }
}

impl TimelineConfig {
    /// Duration after a keyframe ending at `end` was appended
    pub fn grown_duration(&self, current: f32, end: f32) -> f32 {
        if end > current {
            (end + self.duration_padding).min(self.max_auto_duration).max(current)
        } else {
            current
        }
    }
}
