// SPDX-License-Identifier: MIT OR Apache-2.0
//! Direct manipulation: group drag and single-object resize.
//!
//! Both gestures capture a snapshot on pointer press and compute every
//! update relative to it, so intermediate pointer positions never
//! accumulate rounding drift.

use crate::error::Result;
use crate::settings::EditorSettings;
use egui::{Pos2, Vec2};
use keystage_timeline::{Keyframe, KeyframePatch, ObjectId, ResizeMode, Timeline, TimelineError};

fn target_keyframe(timeline: &Timeline, object: ObjectId, index: usize) -> Result<&Keyframe> {
    let obj = timeline.object(object).ok_or(TimelineError::ObjectNotFound(object))?;
    Ok(obj.keyframe(index).ok_or(TimelineError::KeyframeOutOfRange {
        object,
        index,
        len: obj.keyframe_count(),
    })?)
}

fn keyframe_pos(keyframe: &Keyframe) -> Pos2 {
    Pos2::new(keyframe.x, keyframe.y)
}

/// One keyframe moved by a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTarget {
    /// Owning object
    pub object: ObjectId,
    /// Keyframe index
    pub keyframe: usize,
    /// Position when the drag began
    pub origin: Pos2,
}

/// Starting state of a group drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSnapshot {
    grabbed: ObjectId,
    grabbed_origin: Pos2,
    grab_offset: Vec2,
    targets: Vec<DragTarget>,
}

impl DragSnapshot {
    /// Snapshot keyframe `index` of `grabbed` and of every other selected
    /// object that has a keyframe at the same index
    pub fn capture(
        timeline: &Timeline,
        selected: &[ObjectId],
        grabbed: ObjectId,
        index: usize,
        pointer: Pos2,
    ) -> Result<Self> {
        let grabbed_origin = keyframe_pos(target_keyframe(timeline, grabbed, index)?);
        let mut targets = vec![DragTarget {
            object: grabbed,
            keyframe: index,
            origin: grabbed_origin,
        }];

        for &object in selected.iter().filter(|id| **id != grabbed) {
            match target_keyframe(timeline, object, index) {
                Ok(keyframe) => targets.push(DragTarget {
                    object,
                    keyframe: index,
                    origin: keyframe_pos(keyframe),
                }),
                Err(e) => tracing::debug!("Not dragging {}: {}", object, e),
            }
        }

        Ok(Self {
            grabbed,
            grabbed_origin,
            grab_offset: pointer - grabbed_origin,
            targets,
        })
    }

    /// Object under the pointer
    pub fn grabbed(&self) -> ObjectId {
        self.grabbed
    }

    /// Everything moving with the grabbed object
    pub fn targets(&self) -> &[DragTarget] {
        &self.targets
    }

    /// Displacement of the grabbed keyframe for a pointer position
    pub fn delta(&self, pointer: Pos2) -> Vec2 {
        (pointer - self.grab_offset) - self.grabbed_origin
    }

    /// Move every target by the grabbed keyframe's displacement.
    ///
    /// Returns how many keyframes moved; targets deleted mid-gesture are
    /// skipped.
    pub fn apply(&self, timeline: &mut Timeline, pointer: Pos2) -> usize {
        let delta = self.delta(pointer);
        let mut moved = 0;
        for target in &self.targets {
            let pos = target.origin + delta;
            let patch = KeyframePatch::new().position(pos.x, pos.y);
            match timeline.update_keyframe(target.object, target.keyframe, &patch) {
                Ok(()) => moved += 1,
                Err(e) => tracing::debug!("Drag skipped {}: {}", target.object, e),
            }
        }
        moved
    }
}

/// Starting state of a resize
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSnapshot {
    object: ObjectId,
    keyframe: usize,
    mode: ResizeMode,
    pointer: Pos2,
    width: f32,
    height: f32,
    scale: f32,
}

impl ResizeSnapshot {
    /// Snapshot keyframe `index` of `object` under the pointer.
    ///
    /// Keyframes without a box resize from the configured default box.
    pub fn capture(
        timeline: &Timeline,
        object: ObjectId,
        index: usize,
        pointer: Pos2,
        settings: &EditorSettings,
    ) -> Result<Self> {
        let keyframe = target_keyframe(timeline, object, index)?;
        let mode = timeline
            .object(object)
            .map_or(ResizeMode::Scale, |o| o.kind().resize_mode());
        let [default_width, default_height] = settings.default_resize_box;

        Ok(Self {
            object,
            keyframe: index,
            mode,
            pointer,
            width: keyframe.width.unwrap_or(default_width),
            height: keyframe.height.unwrap_or(default_height),
            scale: keyframe.scale,
        })
    }

    /// Object being resized
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// How the pointer maps onto the keyframe
    pub fn mode(&self) -> ResizeMode {
        self.mode
    }

    /// Fields the resize would write for a pointer position
    pub fn patch(&self, pointer: Pos2, settings: &EditorSettings) -> KeyframePatch {
        let d = pointer - self.pointer;
        match self.mode {
            ResizeMode::Box => KeyframePatch::new().size(
                (self.width + d.x).max(settings.min_box_size),
                (self.height + d.y).max(settings.min_box_size),
            ),
            ResizeMode::Scale => {
                let [a, b] = settings.scale_range;
                let sensitivity = settings.scale_sensitivity.max(f32::EPSILON);
                let scale = self.scale + (d.x + d.y) / 2.0 / sensitivity;
                KeyframePatch::new().scale(scale.max(a.min(b)).min(a.max(b)))
            }
        }
    }

    /// Write the resized fields for a pointer position
    pub fn apply(&self, timeline: &mut Timeline, pointer: Pos2, settings: &EditorSettings) -> Result<()> {
        let patch = self.patch(pointer, settings);
        timeline.update_keyframe(self.object, self.keyframe, &patch)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystage_timeline::{Easing, ShapeKind};

    #[test]
    fn test_group_drag_moves_in_lockstep() {
        let mut timeline = Timeline::default();
        let a = timeline.create_object(ShapeKind::Circle, 100.0, 100.0, 0.0);
        let b = timeline.create_object(ShapeKind::Square, 400.0, 50.0, 0.0);

        // Grab A slightly off-center
        let snapshot = DragSnapshot::capture(&timeline, &[a, b], a, 0, Pos2::new(110.0, 95.0)).unwrap();
        assert_eq!(snapshot.targets().len(), 2);

        snapshot.apply(&mut timeline, Pos2::new(140.0, 115.0));
        let pa = timeline.object(a).unwrap().keyframes()[0].position();
        let pb = timeline.object(b).unwrap().keyframes()[0].position();
        assert_eq!(pa, (130.0, 120.0));
        assert_eq!(pb, (430.0, 70.0));

        // Deltas stay relative to the snapshot
        snapshot.apply(&mut timeline, Pos2::new(110.0, 95.0));
        assert_eq!(timeline.object(a).unwrap().keyframes()[0].position(), (100.0, 100.0));
        assert_eq!(timeline.object(b).unwrap().keyframes()[0].position(), (400.0, 50.0));
    }

    #[test]
    fn test_drag_skips_objects_without_index() {
        let mut timeline = Timeline::default();
        let a = timeline.create_object(ShapeKind::Circle, 0.0, 0.0, 0.0);
        let b = timeline.create_object(ShapeKind::Circle, 0.0, 0.0, 0.0);
        timeline
            .append_keyframe(a, 1.0, Easing::Linear, &KeyframePatch::new())
            .unwrap();

        let snapshot = DragSnapshot::capture(&timeline, &[a, b], a, 1, Pos2::ZERO).unwrap();
        assert_eq!(snapshot.targets().len(), 1);
        assert_eq!(snapshot.apply(&mut timeline, Pos2::new(5.0, 5.0)), 1);
        assert_eq!(timeline.object(b).unwrap().keyframes()[0].position(), (0.0, 0.0));
    }

    #[test]
    fn test_drag_survives_deleted_target() {
        let mut timeline = Timeline::default();
        let a = timeline.create_object(ShapeKind::Circle, 0.0, 0.0, 0.0);
        let b = timeline.create_object(ShapeKind::Circle, 0.0, 0.0, 0.0);
        let snapshot = DragSnapshot::capture(&timeline, &[a, b], a, 0, Pos2::ZERO).unwrap();

        timeline.remove_object(b);
        assert_eq!(snapshot.apply(&mut timeline, Pos2::new(1.0, 1.0)), 1);
    }

    #[test]
    fn test_capture_rejects_missing_keyframe() {
        let mut timeline = Timeline::default();
        let a = timeline.create_object(ShapeKind::Circle, 0.0, 0.0, 0.0);
        assert!(DragSnapshot::capture(&timeline, &[a], a, 4, Pos2::ZERO).is_err());
        assert!(DragSnapshot::capture(&timeline, &[], ObjectId::new(), 0, Pos2::ZERO).is_err());
    }

    #[test]
    fn test_box_resize_floors_at_minimum() {
        let settings = EditorSettings::default();
        let mut timeline = Timeline::default();
        let id = timeline.create_object(ShapeKind::Rectangle, 0.0, 0.0, 0.0);
        let snapshot = ResizeSnapshot::capture(&timeline, id, 0, Pos2::new(100.0, 60.0), &settings).unwrap();
        assert_eq!(snapshot.mode(), ResizeMode::Box);

        snapshot.apply(&mut timeline, Pos2::new(130.0, 50.0), &settings).unwrap();
        let kf = &timeline.object(id).unwrap().keyframes()[0];
        assert_eq!((kf.width, kf.height), (Some(130.0), Some(50.0)));

        snapshot.apply(&mut timeline, Pos2::new(-500.0, -500.0), &settings).unwrap();
        let kf = &timeline.object(id).unwrap().keyframes()[0];
        assert_eq!((kf.width, kf.height), (Some(20.0), Some(20.0)));
    }

    #[test]
    fn test_scale_resize_is_clamped() {
        let settings = EditorSettings::default();
        let mut timeline = Timeline::default();
        let id = timeline.create_object(ShapeKind::Circle, 0.0, 0.0, 0.0);
        let snapshot = ResizeSnapshot::capture(&timeline, id, 0, Pos2::ZERO, &settings).unwrap();
        assert_eq!(snapshot.mode(), ResizeMode::Scale);

        // Average delta of 25px is half a unit
        snapshot.apply(&mut timeline, Pos2::new(30.0, 20.0), &settings).unwrap();
        assert_eq!(timeline.object(id).unwrap().keyframes()[0].scale, 1.5);

        snapshot.apply(&mut timeline, Pos2::new(1000.0, 1000.0), &settings).unwrap();
        assert_eq!(timeline.object(id).unwrap().keyframes()[0].scale, 3.0);

        snapshot.apply(&mut timeline, Pos2::new(-1000.0, -1000.0), &settings).unwrap();
        assert_eq!(timeline.object(id).unwrap().keyframes()[0].scale, 0.1);
    }

    #[test]
    fn test_text_scales_instead_of_boxing() {
        let settings = EditorSettings::default();
        let mut timeline = Timeline::default();
        let id = timeline.create_object(ShapeKind::Text, 0.0, 0.0, 0.0);
        let snapshot = ResizeSnapshot::capture(&timeline, id, 0, Pos2::ZERO, &settings).unwrap();
        assert_eq!(snapshot.mode(), ResizeMode::Scale);
    }
}
