// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for animated objects.

use crate::easing::Easing;
use serde::{Deserialize, Serialize};

/// Smallest scale a keyframe may hold
pub const MIN_SCALE: f32 = 0.01;

/// A timed pose of one object.
///
/// `duration` is the length of the transition from this keyframe towards the
/// next one. A zero duration makes the keyframe a static hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    /// Start time in seconds
    pub start_time: f32,
    /// Transition length in seconds
    pub duration: f32,
    /// Canvas X coordinate
    pub x: f32,
    /// Canvas Y coordinate
    pub y: f32,
    /// Box width (box-shaped objects only)
    #[serde(default)]
    pub width: Option<f32>,
    /// Box height (box-shaped objects only)
    #[serde(default)]
    pub height: Option<f32>,
    /// Uniform scale factor
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Rotation in degrees
    #[serde(default)]
    pub rotation: f32,
    /// Opacity in `[0, 1]`
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Fill color as a `#rrggbb` string
    pub color: String,
    /// Text content
    #[serde(default)]
    pub text: String,
    /// Easing of the outgoing transition
    #[serde(default)]
    pub easing: Easing,
}

fn default_scale() -> f32 {
    1.0
}

fn default_opacity() -> f32 {
    1.0
}

impl Keyframe {
    /// Create a static keyframe at time zero
    pub fn new(x: f32, y: f32, color: impl Into<String>) -> Self {
        Self {
            start_time: 0.0,
            duration: 0.0,
            x,
            y,
            width: None,
            height: None,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
            color: color.into(),
            text: String::new(),
            easing: Easing::Linear,
        }
    }

    /// Set the timing
    pub fn with_timing(mut self, start_time: f32, duration: f32) -> Self {
        self.start_time = start_time;
        self.duration = duration.max(0.0);
        self
    }

    /// Set the box size
    pub fn with_box(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the easing
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Time at which this keyframe's transition completes
    pub fn end_time(&self) -> f32 {
        self.start_time + self.duration
    }

    /// Whether `time` lies inside `[start_time, end_time]`
    pub fn spans(&self, time: f32) -> bool {
        time >= self.start_time && time <= self.end_time()
    }

    /// Canvas position
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Merge a patch into this keyframe, clamping degenerate values
    pub fn apply(&mut self, patch: &KeyframePatch) {
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time.max(0.0);
        }
        if let Some(duration) = patch.duration {
            self.duration = duration.max(0.0);
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = Some(width);
        }
        if let Some(height) = patch.height {
            self.height = Some(height);
        }
        if let Some(scale) = patch.scale {
            self.scale = scale.max(MIN_SCALE);
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
        if let Some(text) = &patch.text {
            self.text.clone_from(text);
        }
        if let Some(easing) = patch.easing {
            self.easing = easing;
        }
    }
}

/// Partial keyframe update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyframePatch {
    /// New start time
    pub start_time: Option<f32>,
    /// New duration
    pub duration: Option<f32>,
    /// New X coordinate
    pub x: Option<f32>,
    /// New Y coordinate
    pub y: Option<f32>,
    /// New box width
    pub width: Option<f32>,
    /// New box height
    pub height: Option<f32>,
    /// New scale
    pub scale: Option<f32>,
    /// New rotation
    pub rotation: Option<f32>,
    /// New opacity
    pub opacity: Option<f32>,
    /// New color
    pub color: Option<String>,
    /// New text
    pub text: Option<String>,
    /// New easing
    pub easing: Option<Easing>,
}

impl KeyframePatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch the position
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Patch the box size
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Patch the scale
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Patch the rotation
    pub fn rotation(mut self, rotation: f32) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Patch the opacity
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Patch the color
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Patch the text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Patch the timing
    pub fn timing(mut self, start_time: f32, duration: f32) -> Self {
        self.start_time = Some(start_time);
        self.duration = Some(duration);
        self
    }

    /// Patch the duration only
    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Patch the easing
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Whether the patch moves the keyframe in time
    pub fn touches_start_time(&self) -> bool {
        self.start_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_patch() {
        let mut kf = Keyframe::new(10.0, 20.0, "#ffffff");
        kf.apply(&KeyframePatch::new().position(30.0, 40.0).text("hi").easing(Easing::Bounce));

        assert_eq!(kf.position(), (30.0, 40.0));
        assert_eq!(kf.text, "hi");
        assert_eq!(kf.easing, Easing::Bounce);
        assert_eq!(kf.color, "#ffffff");
        assert_eq!(kf.scale, 1.0);
    }

    #[test]
    fn test_apply_clamps_degenerate_values() {
        let mut kf = Keyframe::new(0.0, 0.0, "#000000");
        kf.apply(&KeyframePatch::new().duration(-3.0).opacity(1.5).scale(-2.0));

        assert_eq!(kf.duration, 0.0);
        assert_eq!(kf.opacity, 1.0);
        assert_eq!(kf.scale, MIN_SCALE);
    }

    #[test]
    fn test_span() {
        let kf = Keyframe::new(0.0, 0.0, "#000000").with_timing(1.0, 2.0);
        assert_eq!(kf.end_time(), 3.0);
        assert!(kf.spans(1.0));
        assert!(kf.spans(3.0));
        assert!(!kf.spans(3.5));
        assert!(!kf.spans(0.5));
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let kf = Keyframe::new(1.0, 2.0, "#3b82f6").with_timing(0.5, 1.5);
        let json = serde_json::to_value(&kf).unwrap();
        assert_eq!(json["startTime"], 0.5);
        assert_eq!(json["duration"], 1.5);
        assert_eq!(json["easing"], "linear");

        let loaded: Keyframe = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, kf);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let kf: Keyframe =
            serde_json::from_str(r##"{"startTime":0,"duration":0,"x":5,"y":6,"color":"#fff"}"##).unwrap();
        assert_eq!(kf.scale, 1.0);
        assert_eq!(kf.opacity, 1.0);
        assert_eq!(kf.rotation, 0.0);
        assert_eq!(kf.easing, Easing::Linear);
        assert!(kf.width.is_none());
        assert!(kf.text.is_empty());
    }
}
