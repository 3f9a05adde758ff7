// SPDX-License-Identifier: MIT OR Apache-2.0
//! What the canvas should draw for one frame.

use keystage_timeline::{AnimatedObject, ObjectId, ShapeKind, Timeline, VisualState};
use serde::Serialize;

/// An earlier keyframe drawn faintly while editing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostPose {
    /// Keyframe index
    pub index: usize,
    /// Pose at that keyframe
    pub state: VisualState,
}

/// One object ready for drawing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedObject {
    /// Object ID
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Shape kind
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Pose to draw
    pub state: VisualState,
    /// Earlier keyframes (editing only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ghosts: Vec<GhostPose>,
    /// Keyframe trail (editing only, at least two points)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub motion_path: Vec<(f32, f32)>,
    /// Whether the object is selected
    pub selected: bool,
}

/// Everything on the canvas at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Play cursor
    pub time: f32,
    /// Whether playback is running
    pub playing: bool,
    /// Objects in drawing order
    pub objects: Vec<RenderedObject>,
}

impl Frame {
    /// Frame during playback: every object at the play cursor
    pub fn playing(timeline: &Timeline, time: f32, is_selected: impl Fn(ObjectId) -> bool) -> Self {
        let objects = timeline
            .objects()
            .filter_map(|object| {
                let state = keystage_timeline::resolve(object, time)?;
                Some(rendered(object, state, Vec::new(), Vec::new(), is_selected(object.id())))
            })
            .collect();
        Self {
            time,
            playing: true,
            objects,
        }
    }

    /// Frame while editing: every object at its last keyframe, with ghosts
    /// of the earlier ones and its motion path
    pub fn editing(timeline: &Timeline, time: f32, is_selected: impl Fn(ObjectId) -> bool) -> Self {
        let objects = timeline
            .objects()
            .filter_map(|object| {
                let (last, earlier) = object.keyframes().split_last()?;
                let ghosts = earlier
                    .iter()
                    .enumerate()
                    .map(|(index, keyframe)| GhostPose {
                        index,
                        state: keyframe.into(),
                    })
                    .collect();
                let path = if object.keyframe_count() >= 2 {
                    object.motion_path()
                } else {
                    Vec::new()
                };
                Some(rendered(object, last.into(), ghosts, path, is_selected(object.id())))
            })
            .collect();
        Self {
            time,
            playing: false,
            objects,
        }
    }

    /// Find an object in the frame
    pub fn object(&self, id: ObjectId) -> Option<&RenderedObject> {
        self.objects.iter().find(|o| o.id == id)
    }
}

fn rendered(
    object: &AnimatedObject,
    state: VisualState,
    ghosts: Vec<GhostPose>,
    motion_path: Vec<(f32, f32)>,
    selected: bool,
) -> RenderedObject {
    RenderedObject {
        id: object.id(),
        name: object.name.clone(),
        kind: object.kind(),
        state,
        ghosts,
        motion_path,
        selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystage_timeline::{Easing, KeyframePatch};

    #[test]
    fn test_editing_frame_shows_last_keyframe_and_ghosts() {
        let mut timeline = Timeline::default();
        let id = timeline.create_object(ShapeKind::Circle, 100.0, 100.0, 0.0);
        timeline
            .append_keyframe(id, 2.0, Easing::Linear, &KeyframePatch::new().position(300.0, 100.0))
            .unwrap();
        let still = timeline.create_object(ShapeKind::Square, 0.0, 0.0, 0.0);

        let frame = Frame::editing(&timeline, 1.0, |o| o == id);
        assert!(!frame.playing);

        let moving = frame.object(id).unwrap();
        assert_eq!(moving.state.x, 300.0);
        assert_eq!(moving.ghosts.len(), 1);
        assert_eq!(moving.ghosts[0].state.x, 100.0);
        assert_eq!(moving.motion_path.len(), 2);
        assert!(moving.selected);

        let still = frame.object(still).unwrap();
        assert!(still.ghosts.is_empty());
        assert!(still.motion_path.is_empty());
        assert!(!still.selected);
    }

    #[test]
    fn test_playing_frame_resolves_cursor() {
        let mut timeline = Timeline::default();
        let id = timeline.create_object(ShapeKind::Circle, 100.0, 100.0, 0.0);
        timeline
            .append_keyframe(id, 2.0, Easing::Linear, &KeyframePatch::new().position(300.0, 100.0))
            .unwrap();

        let frame = Frame::playing(&timeline, 1.0, |_| false);
        assert!(frame.playing);
        let object = frame.object(id).unwrap();
        assert!((object.state.x - 200.0).abs() < 1e-4);
        assert!(object.ghosts.is_empty());
    }

    #[test]
    fn test_frame_json_layout() {
        let mut timeline = Timeline::default();
        timeline.create_object(ShapeKind::Text, 0.0, 0.0, 0.0);
        let value = serde_json::to_value(Frame::editing(&timeline, 0.0, |_| false)).unwrap();
        assert_eq!(value["objects"][0]["type"], "text");
        assert_eq!(value["objects"][0]["state"]["text"], "Double click to edit");
        assert!(value["objects"][0].get("ghosts").is_none());
    }
}
