// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer gesture state machine.

use crate::transform::{DragSnapshot, ResizeSnapshot};
use egui::{Pos2, Rect};

/// Keyboard modifiers held during a pointer press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Ctrl (or Cmd on macOS): toggle membership instead of replacing
    pub toggle: bool,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self { toggle: false };

    /// Ctrl/Cmd held
    pub const TOGGLE: Self = Self { toggle: true };
}

/// Rubber-band selection in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    /// Press position
    pub origin: Pos2,
    /// Latest pointer position
    pub current: Pos2,
}

impl Marquee {
    /// Start a marquee at `origin`
    pub fn new(origin: Pos2) -> Self {
        Self { origin, current: origin }
    }

    /// Region covered so far
    pub fn rect(&self) -> Rect {
        Rect::from_two_pos(self.origin, self.current)
    }

    /// Whether the region is large enough to count as a selection
    pub fn exceeds(&self, min_size: f32) -> bool {
        let rect = self.rect();
        rect.width() > min_size && rect.height() > min_size
    }
}

/// Current pointer gesture
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    /// Nothing in progress
    #[default]
    Idle,
    /// Moving the selected keyframes
    Dragging(DragSnapshot),
    /// Resizing one keyframe
    Resizing(ResizeSnapshot),
    /// Rubber-band selection
    MarqueeSelecting(Marquee),
}

impl Gesture {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging(_) => "dragging",
            Self::Resizing(_) => "resizing",
            Self::MarqueeSelecting(_) => "marquee",
        }
    }

    /// Whether no gesture is in progress
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Marquee region, if selecting
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self {
            Self::MarqueeSelecting(marquee) => Some(marquee.rect()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marquee_rect_normalizes() {
        let marquee = Marquee {
            origin: Pos2::new(50.0, 80.0),
            current: Pos2::new(10.0, 20.0),
        };
        assert_eq!(marquee.rect(), Rect::from_min_max(Pos2::new(10.0, 20.0), Pos2::new(50.0, 80.0)));
    }

    #[test]
    fn test_marquee_threshold_is_strict() {
        let mut marquee = Marquee::new(Pos2::ZERO);
        assert!(!marquee.exceeds(5.0));

        marquee.current = Pos2::new(5.0, 50.0);
        assert!(!marquee.exceeds(5.0));

        marquee.current = Pos2::new(5.5, 5.5);
        assert!(marquee.exceeds(5.0));
    }

    #[test]
    fn test_gesture_names() {
        assert!(Gesture::default().is_idle());
        let gesture = Gesture::MarqueeSelecting(Marquee::new(Pos2::ZERO));
        assert_eq!(gesture.name(), "marquee");
        assert!(gesture.marquee_rect().is_some());
    }
}
