// SPDX-License-Identifier: MIT OR Apache-2.0
//! Resolution of an object's visual state at a point in time.
//!
//! Each keyframe with a positive duration opens a span
//! `[start_time, start_time + duration]` during which the object moves from
//! that keyframe towards the following one. Zero-duration keyframes hold
//! their pose until the next keyframe starts. Before the first keyframe the
//! object is invisible; after the last span it keeps its final pose.

use crate::easing::Easing;
use crate::keyframe::Keyframe;
use crate::object::AnimatedObject;
use serde::{Deserialize, Serialize};

/// Fully resolved drawing state of one object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualState {
    /// Canvas X coordinate
    pub x: f32,
    /// Canvas Y coordinate
    pub y: f32,
    /// Box width, for box-shaped objects
    pub width: Option<f32>,
    /// Box height, for box-shaped objects
    pub height: Option<f32>,
    /// Uniform scale
    pub scale: f32,
    /// Rotation in degrees
    pub rotation: f32,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Fill color
    pub color: String,
    /// Text content
    pub text: String,
}

impl From<&Keyframe> for VisualState {
    fn from(keyframe: &Keyframe) -> Self {
        Self {
            x: keyframe.x,
            y: keyframe.y,
            width: keyframe.width,
            height: keyframe.height,
            scale: keyframe.scale,
            rotation: keyframe.rotation,
            opacity: keyframe.opacity,
            color: keyframe.color.clone(),
            text: keyframe.text.clone(),
        }
    }
}

/// Linear interpolation between two floats
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate a field that only some shapes carry.
///
/// A field missing on the source snaps to the target's value.
fn lerp_optional(a: Option<f32>, b: Option<f32>, t: f32) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(lerp(a, b, t)),
        (None, b) => b,
        (Some(a), None) => Some(a),
    }
}

/// Normalized progress through a keyframe's span, clamped to `[0, 1]`.
///
/// A zero-duration keyframe has already arrived.
pub fn span_progress(keyframe: &Keyframe, time: f32) -> f32 {
    if keyframe.duration <= 0.0 {
        return 1.0;
    }
    ((time - keyframe.start_time) / keyframe.duration).clamp(0.0, 1.0)
}

/// Blend two keyframes at linear `progress` shaped by `easing`.
///
/// Numeric fields interpolate; color and text switch to the target's value.
/// A finished span always lands on the target, even for curves such as
/// bounce that return to zero at the end.
pub fn blend(source: &Keyframe, target: &Keyframe, progress: f32, easing: Easing) -> VisualState {
    let e = if progress >= 1.0 { 1.0 } else { easing.apply(progress) };
    VisualState {
        x: lerp(source.x, target.x, e),
        y: lerp(source.y, target.y, e),
        width: lerp_optional(source.width, target.width, e),
        height: lerp_optional(source.height, target.height, e),
        scale: lerp(source.scale, target.scale, e),
        rotation: lerp(source.rotation, target.rotation, e),
        opacity: lerp(source.opacity, target.opacity, e),
        color: target.color.clone(),
        text: target.text.clone(),
    }
}

/// Resolve an object's visual state at `time`.
///
/// Returns `None` only for an object without keyframes.
pub fn resolve(object: &AnimatedObject, time: f32) -> Option<VisualState> {
    resolve_keyframes(object.keyframes(), time)
}

/// Resolve a keyframe sequence, already ordered by start time, at `time`
pub fn resolve_keyframes(keyframes: &[Keyframe], time: f32) -> Option<VisualState> {
    let first = keyframes.first()?;
    let last = keyframes.last()?;

    if time < first.start_time {
        return Some(VisualState {
            opacity: 0.0,
            ..VisualState::from(first)
        });
    }

    if time >= last.end_time() {
        return Some(last.into());
    }

    for (index, keyframe) in keyframes.iter().enumerate() {
        let next = keyframes.get(index + 1);

        if keyframe.duration > 0.0 && keyframe.spans(time) {
            let progress = span_progress(keyframe, time);
            let state = match next {
                Some(target) => blend(keyframe, target, progress, keyframe.easing),
                None => blend(trailing_source(keyframes, index), keyframe, progress, keyframe.easing),
            };
            return Some(state);
        }

        let next_start = next.map_or(f32::INFINITY, |k| k.start_time);
        if time >= keyframe.start_time && time < next_start {
            return Some(keyframe.into());
        }
    }

    Some(last.into())
}

/// Where the final keyframe's own transition starts from.
///
/// A zero-duration predecessor is still on screen when the last span opens,
/// so the motion runs from it. A predecessor with its own span has already
/// carried the object onto the last keyframe.
fn trailing_source(keyframes: &[Keyframe], index: usize) -> &Keyframe {
    match index.checked_sub(1).and_then(|i| keyframes.get(i)) {
        Some(previous) if previous.duration <= 0.0 => previous,
        _ => &keyframes[index],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(start: f32, duration: f32, x: f32) -> Keyframe {
        Keyframe::new(x, 0.0, "#ffffff").with_timing(start, duration)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_empty() {
        assert!(resolve_keyframes(&[], 1.0).is_none());
    }

    #[test]
    fn test_single_static_keyframe() {
        let kfs = [key(0.0, 0.0, 5.0)];
        for t in [0.0, 1.0, 100.0] {
            assert_eq!(resolve_keyframes(&kfs, t), Some(VisualState::from(&kfs[0])));
        }
    }

    #[test]
    fn test_before_first_keyframe_is_hidden() {
        let kfs = [key(0.0, 1.0, 5.0).with_box(10.0, 20.0), key(1.0, 0.0, 50.0)];
        let state = resolve_keyframes(&kfs, -0.5).unwrap();
        assert_eq!(state.opacity, 0.0);
        assert_eq!(state.x, 5.0);
        assert_eq!(state.width, Some(10.0));
    }

    #[test]
    fn test_span_interpolates_towards_next() {
        let kfs = [key(0.0, 2.0, 0.0), key(2.0, 0.0, 100.0)];
        assert!(approx(resolve_keyframes(&kfs, 0.5).unwrap().x, 25.0));
        assert!(approx(resolve_keyframes(&kfs, 1.0).unwrap().x, 50.0));
        assert_eq!(resolve_keyframes(&kfs, 2.0).unwrap().x, 100.0);
    }

    #[test]
    fn test_easing_shapes_progress() {
        let kfs = [key(0.0, 1.0, 0.0).with_easing(Easing::EaseIn), key(1.0, 0.0, 100.0)];
        assert!(approx(resolve_keyframes(&kfs, 0.5).unwrap().x, 25.0));

        let kfs = [key(0.0, 1.0, 0.0).with_easing(Easing::Bounce), key(1.0, 0.0, 100.0)];
        assert!(approx(resolve_keyframes(&kfs, 0.5).unwrap().x, 100.0));
    }

    #[test]
    fn test_span_end_lands_on_target_for_every_easing() {
        for &easing in Easing::all() {
            let kfs = [key(0.0, 1.0, 0.0).with_easing(easing), key(1.0, 0.0, 100.0)];
            assert_eq!(resolve_keyframes(&kfs, 0.0).unwrap().x, 0.0, "{:?}", easing);
            assert_eq!(resolve_keyframes(&kfs, 1.0).unwrap().x, 100.0, "{:?}", easing);
        }
    }

    #[test]
    fn test_gap_holds_keyframe() {
        let kfs = [key(0.0, 1.0, 0.0), key(3.0, 0.0, 100.0)];
        // Span reaches the next pose at t=1, then the gap holds the source keyframe
        assert_eq!(resolve_keyframes(&kfs, 2.0).unwrap().x, 0.0);
        assert_eq!(resolve_keyframes(&kfs, 3.0).unwrap().x, 100.0);
    }

    #[test]
    fn test_trailing_span_runs_from_static_predecessor() {
        let kfs = [key(0.0, 0.0, 100.0), key(0.0, 2.0, 300.0)];
        assert_eq!(resolve_keyframes(&kfs, 0.0).unwrap().x, 100.0);
        assert!(approx(resolve_keyframes(&kfs, 1.0).unwrap().x, 200.0));
        assert_eq!(resolve_keyframes(&kfs, 2.0).unwrap().x, 300.0);
    }

    #[test]
    fn test_span_with_successor_runs_from_itself() {
        // Once a keyframe follows, its span moves towards that successor
        // and the zero-duration base pose is only a hold before t=0
        let mut kfs = vec![key(0.0, 0.0, 100.0), key(0.0, 2.0, 300.0)];
        assert_eq!(resolve_keyframes(&kfs, 0.0).unwrap().x, 100.0);
        assert!(approx(resolve_keyframes(&kfs, 1.0).unwrap().x, 200.0));

        kfs.push(key(2.0, 1.0, 500.0));
        assert_eq!(resolve_keyframes(&kfs, 0.0).unwrap().x, 300.0);
        assert!(approx(resolve_keyframes(&kfs, 1.0).unwrap().x, 400.0));
        assert_eq!(resolve_keyframes(&kfs, 2.0).unwrap().x, 500.0);
        assert_eq!(resolve_keyframes(&kfs, 2.5).unwrap().x, 500.0);
    }

    #[test]
    fn test_trailing_span_after_moving_predecessor_is_static() {
        let kfs = [key(0.0, 1.0, 0.0), key(1.0, 1.0, 100.0)];
        // No jump back to the first pose once the second has been reached
        assert_eq!(resolve_keyframes(&kfs, 1.0).unwrap().x, 100.0);
        assert_eq!(resolve_keyframes(&kfs, 1.5).unwrap().x, 100.0);
    }

    #[test]
    fn test_optional_fields() {
        let mut source = key(0.0, 1.0, 0.0);
        let target = key(1.0, 0.0, 0.0).with_box(100.0, 50.0);
        let state = blend(&source, &target, 0.5, Easing::Linear);
        assert_eq!((state.width, state.height), (Some(100.0), Some(50.0)));

        source = source.with_box(50.0, 10.0);
        let state = blend(&source, &target, 0.5, Easing::Linear);
        assert_eq!((state.width, state.height), (Some(75.0), Some(30.0)));
    }

    #[test]
    fn test_color_and_text_snap_to_target() {
        let source = key(0.0, 1.0, 0.0).with_text("before");
        let mut target = key(1.0, 0.0, 0.0).with_text("after");
        target.color = "#000000".to_string();

        let state = blend(&source, &target, 0.1, Easing::Linear);
        assert_eq!(state.color, "#000000");
        assert_eq!(state.text, "after");
    }

    #[test]
    fn test_span_progress() {
        let kf = key(1.0, 2.0, 0.0);
        assert_eq!(span_progress(&kf, 0.0), 0.0);
        assert_eq!(span_progress(&kf, 2.0), 0.5);
        assert_eq!(span_progress(&kf, 9.0), 1.0);
        assert_eq!(span_progress(&key(1.0, 0.0, 0.0), 1.0), 1.0);
    }
}
