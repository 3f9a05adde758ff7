// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animated objects and their keyframe sequences.

use crate::keyframe::{Keyframe, KeyframePatch};
use crate::timeline::TimelineError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an animated object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    /// Create a new random object ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// How direct resizing maps pointer motion onto a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Pointer deltas drive width and height
    Box,
    /// Averaged pointer delta drives the uniform scale
    Scale,
}

/// Kind of shape an object draws as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Circle
    Circle,
    /// Square
    Square,
    /// Rectangle with its own width/height
    Rectangle,
    /// Triangle
    Triangle,
    /// Text box
    Text,
}

impl ShapeKind {
    /// Lowercase type name, also used for generated object names
    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Rectangle => "rectangle",
            Self::Triangle => "triangle",
            Self::Text => "text",
        }
    }

    /// All shape kinds, in toolbar order
    pub fn all() -> &'static [ShapeKind] {
        &[
            Self::Circle,
            Self::Square,
            Self::Triangle,
            Self::Rectangle,
            Self::Text,
        ]
    }

    /// Whether keyframes of this shape carry a width/height box
    pub fn has_box(&self) -> bool {
        matches!(self, Self::Rectangle | Self::Text)
    }

    /// How a resize handle acts on this shape
    pub fn resize_mode(&self) -> ResizeMode {
        match self {
            Self::Rectangle => ResizeMode::Box,
            Self::Circle | Self::Square | Self::Triangle | Self::Text => ResizeMode::Scale,
        }
    }

    /// Fill color for newly created objects
    pub fn default_color(&self) -> &'static str {
        match self {
            Self::Circle => "#3b82f6",
            Self::Square => "#ef4444",
            Self::Rectangle => "#f59e0b",
            Self::Triangle => "#10b981",
            Self::Text => "#ffffff",
        }
    }

    /// Box size for newly created objects, if the shape has one
    pub fn default_box(&self) -> Option<(f32, f32)> {
        match self {
            Self::Rectangle => Some((100.0, 60.0)),
            Self::Text => Some((200.0, 40.0)),
            Self::Circle | Self::Square | Self::Triangle => None,
        }
    }

    /// Text content for newly created objects
    pub fn default_text(&self) -> &'static str {
        match self {
            Self::Text => "Double click to edit",
            Self::Circle | Self::Square | Self::Rectangle | Self::Triangle => "",
        }
    }

    /// The pose a new object of this kind starts from
    pub fn base_keyframe(&self, x: f32, y: f32) -> Keyframe {
        let keyframe = Keyframe::new(x, y, self.default_color()).with_text(self.default_text());
        match self.default_box() {
            Some((width, height)) => keyframe.with_box(width, height),
            None => keyframe,
        }
    }
}

/// Check the ordering invariant of a keyframe sequence
pub fn validate_keyframes(keyframes: &[Keyframe]) -> Result<(), TimelineError> {
    let Some(first) = keyframes.first() else {
        return Err(TimelineError::EmptyObject);
    };
    if first.start_time != 0.0 {
        return Err(TimelineError::OutOfOrder {
            index: 0,
            start_time: first.start_time,
        });
    }
    for (index, pair) in keyframes.windows(2).enumerate() {
        if pair[1].start_time < pair[0].start_time {
            return Err(TimelineError::OutOfOrder {
                index: index + 1,
                start_time: pair[1].start_time,
            });
        }
    }
    Ok(())
}

/// An object on the canvas with its keyframe sequence
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedObject {
    id: ObjectId,
    /// Display name
    pub name: String,
    kind: ShapeKind,
    keyframes: Vec<Keyframe>,
}

impl AnimatedObject {
    /// Build an object from an existing keyframe sequence.
    ///
    /// The sequence must be non-empty, start at time zero and be ordered.
    pub fn new(
        id: ObjectId,
        name: impl Into<String>,
        kind: ShapeKind,
        keyframes: Vec<Keyframe>,
    ) -> Result<Self, TimelineError> {
        validate_keyframes(&keyframes)?;
        Ok(Self {
            id,
            name: name.into(),
            kind,
            keyframes,
        })
    }

    /// Create a fresh object at `(x, y)`.
    ///
    /// With a positive `start_time` the object stays hidden until then and
    /// fades in over `fade_duration`.
    pub fn create(
        kind: ShapeKind,
        name: impl Into<String>,
        x: f32,
        y: f32,
        start_time: f32,
        fade_duration: f32,
    ) -> Self {
        let base = kind.base_keyframe(x, y);
        let fade_duration = fade_duration.max(0.0);

        let keyframes = if start_time > 0.0 {
            vec![
                base.clone().with_timing(0.0, start_time).with_opacity(0.0),
                base.clone().with_timing(start_time, fade_duration).with_opacity(0.0),
                base.with_timing(start_time + fade_duration, 0.0).with_opacity(1.0),
            ]
        } else {
            vec![base]
        };

        Self {
            id: ObjectId::new(),
            name: name.into(),
            kind,
            keyframes,
        }
    }

    /// Object ID
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Shape kind
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// All keyframes, ordered by start time
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Keyframe at `index`
    pub fn keyframe(&self, index: usize) -> Option<&Keyframe> {
        self.keyframes.get(index)
    }

    /// Number of keyframes (never zero)
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Index of the last keyframe
    pub fn last_index(&self) -> usize {
        self.keyframes.len().saturating_sub(1)
    }

    /// The static state shown while not playing
    pub fn last_keyframe(&self) -> Option<&Keyframe> {
        self.keyframes.last()
    }

    /// Time at which a newly appended keyframe starts
    pub fn next_start_time(&self) -> f32 {
        self.keyframes.last().map(Keyframe::end_time).unwrap_or(0.0)
    }

    /// Append a keyframe; it may not start before the current last one
    pub fn push_keyframe(&mut self, keyframe: Keyframe) -> Result<usize, TimelineError> {
        let last_start = self.keyframes.last().map(|k| k.start_time).unwrap_or(0.0);
        if keyframe.start_time < last_start || (self.keyframes.is_empty() && keyframe.start_time != 0.0) {
            return Err(TimelineError::OutOfOrder {
                index: self.keyframes.len(),
                start_time: keyframe.start_time,
            });
        }
        self.keyframes.push(keyframe);
        Ok(self.keyframes.len() - 1)
    }

    /// Merge a patch into the keyframe at `index`.
    ///
    /// Patches that would break the start-time ordering are rejected and
    /// leave the keyframe untouched.
    pub fn update_keyframe(&mut self, index: usize, patch: &KeyframePatch) -> Result<(), TimelineError> {
        let len = self.keyframes.len();
        let Some(current) = self.keyframes.get(index) else {
            return Err(TimelineError::KeyframeOutOfRange {
                object: self.id,
                index,
                len,
            });
        };

        let mut updated = current.clone();
        updated.apply(patch);

        if patch.touches_start_time() {
            let before = index.checked_sub(1).map(|i| self.keyframes[i].start_time);
            let after = self.keyframes.get(index + 1).map(|k| k.start_time);
            let misplaced = (index == 0 && updated.start_time != 0.0)
                || before.is_some_and(|t| updated.start_time < t)
                || after.is_some_and(|t| updated.start_time > t);
            if misplaced {
                return Err(TimelineError::OutOfOrder {
                    index,
                    start_time: updated.start_time,
                });
            }
        }

        self.keyframes[index] = updated;
        Ok(())
    }

    /// Remove the keyframe at `index`; the first keyframe is permanent
    pub fn remove_keyframe(&mut self, index: usize) -> Result<Keyframe, TimelineError> {
        if index == 0 {
            return Err(TimelineError::PermanentKeyframe(self.id));
        }
        if index >= self.keyframes.len() {
            return Err(TimelineError::KeyframeOutOfRange {
                object: self.id,
                index,
                len: self.keyframes.len(),
            });
        }
        Ok(self.keyframes.remove(index))
    }

    /// Time at which the object's last transition completes
    pub fn end_time(&self) -> f32 {
        self.next_start_time()
    }

    /// Keyframe positions in order, for drawing a motion trail
    pub fn motion_path(&self) -> Vec<(f32, f32)> {
        self.keyframes.iter().map(Keyframe::position).collect()
    }

    /// Copy this object under a new ID and name
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            kind: self.kind,
            keyframes: self.keyframes.clone(),
        }
    }

    /// Shift every keyframe by `(dx, dy)`
    pub fn translate(&mut self, dx: f32, dy: f32) {
        for keyframe in &mut self.keyframes {
            keyframe.x += dx;
            keyframe.y += dy;
        }
    }
}
