// SPDX-License-Identifier: MIT OR Apache-2.0
//! Serializable view of a timeline.
//!
//! The document mirrors the exported layout
//! `{ duration, objects: [{ id, name, type, transitions }] }`. The core never
//! touches the file system; callers write the JSON wherever they like.

use crate::config::TimelineConfig;
use crate::keyframe::Keyframe;
use crate::object::{AnimatedObject, ObjectId, ShapeKind};
use crate::timeline::{Timeline, TimelineError};
use serde::{Deserialize, Serialize};

/// Document load/save failures
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// An object in the document breaks the keyframe invariants
    #[error("Invalid object '{name}': {source}")]
    InvalidObject {
        /// Object name
        name: String,
        /// Violated invariant
        source: TimelineError,
    },

    /// Two objects share an ID
    #[error("Duplicate object ID: {0}")]
    DuplicateId(ObjectId),

    /// Malformed or unserializable JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One object in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDocument {
    /// Object ID
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Shape kind
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Keyframes in order
    pub transitions: Vec<Keyframe>,
}

/// A whole timeline as a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineDocument {
    /// Playback length in seconds
    pub duration: f32,
    /// Objects in creation order
    pub objects: Vec<ObjectDocument>,
}

impl From<&AnimatedObject> for ObjectDocument {
    fn from(object: &AnimatedObject) -> Self {
        Self {
            id: object.id(),
            name: object.name.clone(),
            kind: object.kind(),
            transitions: object.keyframes().to_vec(),
        }
    }
}

impl From<&Timeline> for TimelineDocument {
    fn from(timeline: &Timeline) -> Self {
        Self {
            duration: timeline.duration,
            objects: timeline.objects().map(ObjectDocument::from).collect(),
        }
    }
}

impl TimelineDocument {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a timeline, validating every object
    pub fn into_timeline(self, config: TimelineConfig) -> Result<Timeline, DocumentError> {
        let mut timeline = Timeline::new(config);
        for object in self.objects {
            if timeline.contains(object.id) {
                return Err(DocumentError::DuplicateId(object.id));
            }
            let name = object.name.clone();
            let object = AnimatedObject::new(object.id, object.name, object.kind, object.transitions)
                .map_err(|source| DocumentError::InvalidObject { name, source })?;
            timeline.insert_object(object);
        }
        timeline.duration = self.duration.max(0.0);
        Ok(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::keyframe::KeyframePatch;

    fn sample_timeline() -> (Timeline, ObjectId) {
        let mut timeline = Timeline::default();
        let id = timeline.create_object(ShapeKind::Circle, 100.0, 100.0, 0.0);
        timeline
            .append_keyframe(id, 2.0, Easing::EaseOut, &KeyframePatch::new().position(300.0, 100.0))
            .unwrap();
        timeline.create_object(ShapeKind::Text, 10.0, 10.0, 1.0);
        (timeline, id)
    }

    #[test]
    fn test_document_layout() {
        let (timeline, id) = sample_timeline();
        let json = TimelineDocument::from(&timeline).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["duration"], 15.0);
        assert_eq!(value["objects"][0]["id"], id.0.to_string());
        assert_eq!(value["objects"][0]["type"], "circle");
        assert_eq!(value["objects"][0]["name"], "circle_1");
        assert_eq!(value["objects"][0]["transitions"][1]["easing"], "ease-out");
        assert_eq!(value["objects"][1]["transitions"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_reload_preserves_objects() {
        let (timeline, id) = sample_timeline();
        let json = TimelineDocument::from(&timeline).to_json().unwrap();
        let loaded = TimelineDocument::from_json(&json)
            .unwrap()
            .into_timeline(TimelineConfig::default())
            .unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.object(id), timeline.object(id));
        assert_eq!(loaded.duration, timeline.duration);
    }

    #[test]
    fn test_rejects_invalid_objects() {
        let (timeline, _) = sample_timeline();
        let mut document = TimelineDocument::from(&timeline);
        document.objects[0].transitions.clear();
        assert!(matches!(
            document.into_timeline(TimelineConfig::default()),
            Err(DocumentError::InvalidObject { source: TimelineError::EmptyObject, .. })
        ));

        let mut document = TimelineDocument::from(&timeline);
        let duplicate = document.objects[0].clone();
        document.objects.push(duplicate);
        assert!(matches!(
            document.into_timeline(TimelineConfig::default()),
            Err(DocumentError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(TimelineDocument::from_json("{ not json"), Err(DocumentError::Json(_))));
    }
}
