// SPDX-License-Identifier: MIT OR Apache-2.0
//! Object selection and the active keyframe.

use egui::{Pos2, Rect};
use keystage_timeline::{ObjectId, Timeline};

/// Ordered set of selected objects.
///
/// The first selected object is the primary one; the active keyframe index
/// refers to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    objects: Vec<ObjectId>,
    active_keyframe: Option<usize>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an object is selected
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains(&id)
    }

    /// Add an object (idempotent)
    pub fn add(&mut self, id: ObjectId) {
        if !self.contains(id) {
            self.objects.push(id);
        }
    }

    /// Remove an object; the active keyframe goes with the last one
    pub fn remove(&mut self, id: ObjectId) {
        self.objects.retain(|o| *o != id);
        if self.objects.is_empty() {
            self.active_keyframe = None;
        }
    }

    /// Toggle an object's membership
    pub fn toggle(&mut self, id: ObjectId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.add(id);
        }
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.objects.clear();
        self.active_keyframe = None;
    }

    /// Replace the selection wholesale
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ObjectId>, active_keyframe: Option<usize>) {
        self.objects.clear();
        for id in ids {
            self.add(id);
        }
        self.active_keyframe = if self.objects.is_empty() { None } else { active_keyframe };
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of selected objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Selected objects in selection order
    pub fn ids(&self) -> &[ObjectId] {
        &self.objects
    }

    /// Iterate over selected objects
    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.iter().copied()
    }

    /// The primary (first) selected object
    pub fn primary(&self) -> Option<ObjectId> {
        self.objects.first().copied()
    }

    /// Index of the keyframe being edited on the primary object
    pub fn active_keyframe(&self) -> Option<usize> {
        self.active_keyframe
    }

    /// Set the active keyframe index
    pub fn set_active_keyframe(&mut self, index: Option<usize>) {
        self.active_keyframe = index;
    }

    /// Plain click: select only `id`, editing its last keyframe
    pub fn click(&mut self, id: ObjectId, timeline: &Timeline) -> bool {
        let Some(object) = timeline.object(id) else {
            return false;
        };
        self.objects.clear();
        self.objects.push(id);
        self.active_keyframe = Some(object.last_index());
        true
    }

    /// Ctrl/Cmd click: flip `id` without touching the rest
    pub fn toggle_click(&mut self, id: ObjectId, timeline: &Timeline) -> bool {
        if !timeline.contains(id) && !self.contains(id) {
            return false;
        }
        self.toggle(id);
        if self.active_keyframe.is_none() && !self.is_empty() {
            self.active_keyframe = timeline.object(id).map(|o| o.last_index());
        }
        true
    }

    /// Marquee release: select every object whose last keyframe lies in `region`
    pub fn select_region(&mut self, region: Rect, timeline: &Timeline) -> usize {
        let hits: Vec<ObjectId> = timeline
            .static_positions()
            .filter(|(_, (x, y))| region.contains(Pos2::new(*x, *y)))
            .map(|(id, _)| id)
            .collect();
        let count = hits.len();
        self.replace(hits, Some(0));
        count
    }

    /// Drop objects that no longer exist
    pub fn retain_existing(&mut self, timeline: &Timeline) {
        self.objects.retain(|id| timeline.contains(*id));
        if self.objects.is_empty() {
            self.active_keyframe = None;
        }
    }

    /// Keep the active index on the same keyframe after `removed` was deleted
    /// from the primary object
    pub fn keyframe_removed(&mut self, object: ObjectId, removed: usize) {
        if self.primary() != Some(object) {
            return;
        }
        if let Some(active) = self.active_keyframe {
            if active == removed {
                self.active_keyframe = Some(active.saturating_sub(1));
            } else if active > removed {
                self.active_keyframe = Some(active - 1);
            }
        }
    }
}
