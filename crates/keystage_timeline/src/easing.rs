// SPDX-License-Identifier: MIT OR Apache-2.0
//! Easing curves applied to a keyframe's transition progress.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Easing curve used by a keyframe for its outgoing transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Constant speed
    #[default]
    Linear,
    /// Starts slow, quadratic
    EaseIn,
    /// Ends slow, quadratic
    EaseOut,
    /// Slow at both ends
    EaseInOut,
    /// Rises to the target and falls back (half sine)
    Bounce,
}

impl Easing {
    /// Map normalized progress to eased progress.
    ///
    /// `t` is not clamped here; callers clamp it to `[0, 1]` first.
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::Bounce => (t * PI).sin(),
        }
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::EaseIn => "Ease In",
            Self::EaseOut => "Ease Out",
            Self::EaseInOut => "Ease In Out",
            Self::Bounce => "Bounce",
        }
    }

    /// All easing curves, in menu order
    pub fn all() -> &'static [Easing] {
        &[
            Self::Linear,
            Self::EaseIn,
            Self::EaseOut,
            Self::EaseInOut,
            Self::Bounce,
        ]
    }
}

/// Free-function form of [`Easing::apply`].
pub fn ease(t: f32, kind: Easing) -> f32 {
    kind.apply(t)
}
