// SPDX-License-Identifier: MIT OR Apache-2.0
//! Internal clipboard for objects and keyframes.

use crate::error::{EditError, Result};
use keystage_timeline::{AnimatedObject, Keyframe, ObjectId, Timeline, TimelineError};

/// Suffix appended to the names of copied objects
pub const COPY_SUFFIX: &str = "_copy";

/// A copied object and the object it came from
#[derive(Debug, Clone, PartialEq)]
pub struct CopiedObject {
    /// Object the copy was taken from
    pub source: ObjectId,
    /// Detached copy, already renamed
    pub object: AnimatedObject,
}

/// Clipboard payload
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClipboardContent {
    /// Nothing copied
    #[default]
    Empty,
    /// A single keyframe, not bound to any object
    Keyframe(Keyframe),
    /// Whole objects with their keyframes
    Objects(Vec<CopiedObject>),
}

/// Editor clipboard
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    content: ClipboardContent,
}

impl Clipboard {
    /// Create an empty clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Current payload
    pub fn content(&self) -> &ClipboardContent {
        &self.content
    }

    /// Check if nothing is copied
    pub fn is_empty(&self) -> bool {
        matches!(self.content, ClipboardContent::Empty)
    }

    /// Drop the payload
    pub fn clear(&mut self) {
        self.content = ClipboardContent::Empty;
    }

    /// Copy objects. Unknown IDs are skipped; returns how many were copied.
    pub fn copy_objects(&mut self, timeline: &Timeline, ids: &[ObjectId]) -> usize {
        let copies: Vec<CopiedObject> = ids
            .iter()
            .filter_map(|id| timeline.object(*id))
            .map(|object| CopiedObject {
                source: object.id(),
                object: object.duplicate(format!("{}{}", object.name, COPY_SUFFIX)),
            })
            .collect();

        let count = copies.len();
        if count == 0 {
            return 0;
        }
        self.content = ClipboardContent::Objects(copies);
        tracing::info!("Copied {} objects to clipboard", count);
        count
    }

    /// Copy one keyframe
    pub fn copy_keyframe(&mut self, timeline: &Timeline, object: ObjectId, index: usize) -> Result<()> {
        let obj = timeline.object(object).ok_or(TimelineError::ObjectNotFound(object))?;
        let keyframe = obj.keyframe(index).ok_or(TimelineError::KeyframeOutOfRange {
            object,
            index,
            len: obj.keyframe_count(),
        })?;
        self.content = ClipboardContent::Keyframe(keyframe.clone());
        tracing::info!("Copied keyframe {} of {}", index, obj.name);
        Ok(())
    }

    /// Insert the copied objects under fresh IDs, shifted by `offset`.
    ///
    /// Returns the new IDs in copy order. The payload stays on the clipboard
    /// so it can be pasted again.
    pub fn paste_objects(&self, timeline: &mut Timeline, offset: [f32; 2]) -> Result<Vec<ObjectId>> {
        let ClipboardContent::Objects(copies) = &self.content else {
            return Err(EditError::NothingToPaste);
        };

        let ids: Vec<ObjectId> = copies
            .iter()
            .map(|copy| {
                let mut object = copy.object.duplicate(copy.object.name.clone());
                object.translate(offset[0], offset[1]);
                timeline.insert_object(object)
            })
            .collect();

        tracing::info!("Pasted {} objects from clipboard", ids.len());
        Ok(ids)
    }

    /// Append the copied keyframe to `target`.
    ///
    /// The pasted keyframe keeps every copied field except its position,
    /// which stays where the target currently rests.
    pub fn paste_keyframe(&self, timeline: &mut Timeline, target: ObjectId) -> Result<usize> {
        let ClipboardContent::Keyframe(keyframe) = &self.content else {
            return Err(EditError::NothingToPaste);
        };
        let last = timeline
            .object(target)
            .and_then(AnimatedObject::last_keyframe)
            .ok_or(TimelineError::ObjectNotFound(target))?;

        let mut keyframe = keyframe.clone();
        (keyframe.x, keyframe.y) = last.position();
        let index = timeline.append_copy(target, keyframe)?;
        tracing::info!("Pasted keyframe as #{} of {}", index, target);
        Ok(index)
    }

    /// Forget copies taken from a deleted object
    pub fn purge(&mut self, source: ObjectId) {
        if let ClipboardContent::Objects(copies) = &mut self.content {
            copies.retain(|copy| copy.source != source);
            if copies.is_empty() {
                self.content = ClipboardContent::Empty;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystage_timeline::{Easing, KeyframePatch, ShapeKind};

    #[test]
    fn test_paste_objects_offsets_and_renames() {
        let mut timeline = Timeline::default();
        let id = timeline.create_object(ShapeKind::Circle, 100.0, 100.0, 0.0);
        timeline
            .append_keyframe(id, 1.0, Easing::Linear, &KeyframePatch::new().position(300.0, 100.0))
            .unwrap();

        let mut clipboard = Clipboard::new();
        assert_eq!(clipboard.copy_objects(&timeline, &[id]), 1);
        let pasted = clipboard.paste_objects(&mut timeline, [50.0, 50.0]).unwrap();

        assert_eq!(pasted.len(), 1);
        assert_ne!(pasted[0], id);
        let copy = timeline.object(pasted[0]).unwrap();
        assert_eq!(copy.name, "circle_1_copy");
        assert_eq!(copy.motion_path(), vec![(150.0, 150.0), (350.0, 150.0)]);
        assert_eq!(timeline.object(id).unwrap().keyframes()[0].position(), (100.0, 100.0));
    }

    #[test]
    fn test_paste_twice_gives_distinct_ids() {
        let mut timeline = Timeline::default();
        let id = timeline.create_object(ShapeKind::Square, 0.0, 0.0, 0.0);
        let mut clipboard = Clipboard::new();
        clipboard.copy_objects(&timeline, &[id]);

        let first = clipboard.paste_objects(&mut timeline, [50.0, 50.0]).unwrap();
        let second = clipboard.paste_objects(&mut timeline, [50.0, 50.0]).unwrap();
        assert_ne!(first, second);
        assert_eq!(timeline.len(), 3);
    }

    #[test]
    fn test_paste_keyframe_keeps_destination_position() {
        let mut timeline = Timeline::default();
        let a = timeline.create_object(ShapeKind::Circle, 0.0, 0.0, 0.0);
        let b = timeline.create_object(ShapeKind::Circle, 500.0, 400.0, 0.0);
        timeline
            .update_keyframe(a, 0, &KeyframePatch::new().opacity(0.25).duration(1.5))
            .unwrap();

        let mut clipboard = Clipboard::new();
        clipboard.copy_keyframe(&timeline, a, 0).unwrap();
        let index = clipboard.paste_keyframe(&mut timeline, b).unwrap();

        let pasted = &timeline.object(b).unwrap().keyframes()[index];
        assert_eq!(index, 1);
        assert_eq!(pasted.position(), (500.0, 400.0));
        assert_eq!((pasted.opacity, pasted.duration, pasted.start_time), (0.25, 1.5, 0.0));
    }

    #[test]
    fn test_wrong_payload() {
        let mut timeline = Timeline::default();
        let id = timeline.create_object(ShapeKind::Circle, 0.0, 0.0, 0.0);
        let clipboard = Clipboard::new();
        assert_eq!(clipboard.paste_objects(&mut timeline, [0.0, 0.0]), Err(EditError::NothingToPaste));
        assert_eq!(clipboard.paste_keyframe(&mut timeline, id), Err(EditError::NothingToPaste));
    }

    #[test]
    fn test_copy_keyframe_out_of_range() {
        let mut timeline = Timeline::default();
        let id = timeline.create_object(ShapeKind::Circle, 0.0, 0.0, 0.0);
        let mut clipboard = Clipboard::new();
        assert!(clipboard.copy_keyframe(&timeline, id, 3).is_err());
        assert!(clipboard.is_empty());
    }

    #[test]
    fn test_purge_source() {
        let mut timeline = Timeline::default();
        let a = timeline.create_object(ShapeKind::Circle, 0.0, 0.0, 0.0);
        let b = timeline.create_object(ShapeKind::Circle, 0.0, 0.0, 0.0);
        let mut clipboard = Clipboard::new();
        clipboard.copy_objects(&timeline, &[a, b]);

        clipboard.purge(a);
        assert!(matches!(clipboard.content(), ClipboardContent::Objects(c) if c.len() == 1));
        clipboard.purge(b);
        assert!(clipboard.is_empty());
    }
}
