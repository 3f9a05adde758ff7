// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline containing every animated object.

use crate::config::TimelineConfig;
use crate::easing::Easing;
use crate::interpolation::{self, VisualState};
use crate::keyframe::{Keyframe, KeyframePatch};
use crate::object::{AnimatedObject, ObjectId, ShapeKind};
use indexmap::IndexMap;

/// Reasons a timeline mutation had no effect
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimelineError {
    /// No object with this ID exists
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// Keyframe index past the end of the sequence
    #[error("Keyframe {index} out of range for object {object} ({len} keyframes)")]
    KeyframeOutOfRange {
        /// Target object
        object: ObjectId,
        /// Requested index
        index: usize,
        /// Number of keyframes the object has
        len: usize,
    },

    /// The first keyframe lives as long as its object
    #[error("The first keyframe of object {0} cannot be removed")]
    PermanentKeyframe(ObjectId),

    /// Start times would no longer be ordered (or keyframe 0 would leave t=0)
    #[error("Keyframe {index} would start out of order at {start_time}s")]
    OutOfOrder {
        /// Offending keyframe index
        index: usize,
        /// Rejected start time
        start_time: f32,
    },

    /// A keyframe sequence must hold at least one keyframe
    #[error("Object has no keyframes")]
    EmptyObject,
}

/// The set of animated objects and the playback length
#[derive(Debug, Clone)]
pub struct Timeline {
    objects: IndexMap<ObjectId, AnimatedObject>,
    /// Playback length in seconds
    pub duration: f32,
    config: TimelineConfig,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            objects: IndexMap::new(),
            duration: config.default_duration,
            config,
        }
    }

    /// Timeline tuning
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Create an object at `(x, y)` that appears at `start_time`
    pub fn create_object(&mut self, kind: ShapeKind, x: f32, y: f32, start_time: f32) -> ObjectId {
        let name = format!("{}_{}", kind.name(), self.count_of_kind(kind) + 1);
        let object = AnimatedObject::create(kind, name, x, y, start_time, self.config.fade_in_duration);
        tracing::debug!("Created {} ({} keyframes)", object.name, object.keyframe_count());
        self.insert_object(object)
    }

    /// Insert a fully built object.
    ///
    /// The duration is left alone; only appending keyframes grows it.
    pub fn insert_object(&mut self, object: AnimatedObject) -> ObjectId {
        let id = object.id();
        self.objects.insert(id, object);
        id
    }

    /// Remove an object
    pub fn remove_object(&mut self, id: ObjectId) -> Option<AnimatedObject> {
        self.objects.shift_remove(&id)
    }

    /// Get an object
    pub fn object(&self, id: ObjectId) -> Option<&AnimatedObject> {
        self.objects.get(&id)
    }

    /// Get a mutable object
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut AnimatedObject> {
        self.objects.get_mut(&id)
    }

    /// Whether an object exists
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// All objects, in creation order
    pub fn objects(&self) -> impl Iterator<Item = &AnimatedObject> {
        self.objects.values()
    }

    /// All object IDs, in creation order
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    /// Object count
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the timeline holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of objects of a shape kind
    pub fn count_of_kind(&self, kind: ShapeKind) -> usize {
        self.objects.values().filter(|o| o.kind() == kind).count()
    }

    /// Latest keyframe end over all objects
    pub fn content_duration(&self) -> f32 {
        self.objects.values().map(AnimatedObject::end_time).fold(0.0, f32::max)
    }

    fn object_entry(&mut self, id: ObjectId) -> Result<&mut AnimatedObject, TimelineError> {
        self.objects.get_mut(&id).ok_or(TimelineError::ObjectNotFound(id))
    }

    fn grow_to(&mut self, end: f32) {
        let grown = self.config.grown_duration(self.duration, end);
        if grown != self.duration {
            tracing::debug!("Timeline duration grew from {}s to {}s", self.duration, grown);
            self.duration = grown;
        }
    }

    /// Append a keyframe after the object's last one.
    ///
    /// The new keyframe starts where the last one ends and copies its
    /// fields before `overrides` are applied. Returns the new index.
    pub fn append_keyframe(
        &mut self,
        id: ObjectId,
        duration: f32,
        easing: Easing,
        overrides: &KeyframePatch,
    ) -> Result<usize, TimelineError> {
        let object = self.object_entry(id)?;
        let mut keyframe = object.last_keyframe().cloned().ok_or(TimelineError::EmptyObject)?;
        keyframe.apply(overrides);
        keyframe.start_time = object.next_start_time();
        keyframe.duration = duration.max(0.0);
        keyframe.easing = easing;

        let end = keyframe.end_time();
        let index = object.push_keyframe(keyframe)?;
        self.grow_to(end);
        Ok(index)
    }

    /// Append a copy of `keyframe` after the object's last one, keeping
    /// every field except the start time. Returns the new index.
    pub fn append_copy(&mut self, id: ObjectId, mut keyframe: Keyframe) -> Result<usize, TimelineError> {
        let object = self.object_entry(id)?;
        keyframe.start_time = object.next_start_time();

        let end = keyframe.end_time();
        let index = object.push_keyframe(keyframe)?;
        self.grow_to(end);
        Ok(index)
    }

    /// Merge fields into one keyframe
    pub fn update_keyframe(&mut self, id: ObjectId, index: usize, patch: &KeyframePatch) -> Result<(), TimelineError> {
        self.object_entry(id)?.update_keyframe(index, patch)
    }

    /// Delete one keyframe; later keyframes shift down by one
    pub fn delete_keyframe(&mut self, id: ObjectId, index: usize) -> Result<Keyframe, TimelineError> {
        self.object_entry(id)?.remove_keyframe(index)
    }

    /// Static canvas position (last keyframe) of every object
    pub fn static_positions(&self) -> impl Iterator<Item = (ObjectId, (f32, f32))> + '_ {
        self.objects
            .values()
            .filter_map(|o| o.last_keyframe().map(|k| (o.id(), k.position())))
    }

    /// Resolve an object's visual state at `time`
    pub fn resolve(&self, id: ObjectId, time: f32) -> Option<VisualState> {
        self.object(id).and_then(|o| interpolation::resolve(o, time))
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}
