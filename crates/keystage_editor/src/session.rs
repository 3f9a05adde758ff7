// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor session: the timeline plus everything the user is doing to it.
//!
//! Every command on [`EditorSession`] follows the same contract. Stale or
//! invalid requests (unknown objects, out-of-range keyframes, gestures
//! during playback) leave the session untouched, are logged at debug level
//! and report "no effect" through the return value. Nothing here panics.

use crate::clipboard::{Clipboard, ClipboardContent};
use crate::error::{EditError, Result};
use crate::frame::Frame;
use crate::gesture::{Gesture, Marquee, Modifiers};
use crate::selection::Selection;
use crate::settings::EditorSettings;
use crate::transform::{DragSnapshot, ResizeSnapshot};
use egui::{Pos2, Rect};
use keystage_timeline::{
    Clock, DocumentError, Easing, KeyframePatch, ObjectId, PlaybackController, ShapeKind, SystemClock,
    TickOutcome, Timeline, TimelineDocument, VisualState,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Session shared between the UI thread and the playback scheduler
pub type SharedSession = Arc<Mutex<EditorSession>>;

/// Log a rejected command and collapse it to "no effect"
fn accepted<T>(command: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("{} ignored: {}", command, e);
            None
        }
    }
}

/// Timeline, selection, clipboard, playback and gesture state
pub struct EditorSession {
    timeline: Timeline,
    selection: Selection,
    clipboard: Clipboard,
    playback: PlaybackController,
    gesture: Gesture,
    settings: EditorSettings,
    clock: Arc<dyn Clock>,
}

impl EditorSession {
    /// Create a session on the system clock
    pub fn new(settings: EditorSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Create a session on a custom clock
    pub fn with_clock(settings: EditorSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            timeline: Timeline::new(settings.timeline.clone()),
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            playback: PlaybackController::new(),
            gesture: Gesture::Idle,
            settings,
            clock,
        }
    }

    /// Wrap the session for sharing with the scheduler
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// The timeline
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Clipboard
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Playback controller
    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// Gesture in progress
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Editor settings
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Create an object at `position` and select it
    pub fn create_object(&mut self, kind: ShapeKind, position: Pos2, start_time: f32) -> ObjectId {
        let id = self.timeline.create_object(kind, position.x, position.y, start_time.max(0.0));
        self.selection.click(id, &self.timeline);
        tracing::info!("Created {} object {}", kind.name(), id);
        id
    }

    /// Append a keyframe to one object. Returns the new keyframe index.
    pub fn append_keyframe(
        &mut self,
        id: ObjectId,
        duration: f32,
        easing: Easing,
        overrides: &KeyframePatch,
    ) -> Option<usize> {
        let result = self.timeline.append_keyframe(id, duration, easing, overrides);
        accepted("append_keyframe", result.map_err(EditError::from))
    }

    /// Append a keyframe to every selected object.
    ///
    /// The primary object's new keyframe becomes the active one. Returns how
    /// many objects received a keyframe.
    pub fn add_transition(&mut self, duration: f32, easing: Easing) -> usize {
        if self.selection.is_empty() {
            tracing::debug!("add_transition ignored: {}", EditError::NothingSelected);
            return 0;
        }

        let mut added = 0;
        let primary = self.selection.primary();
        for id in self.selection.ids().to_vec() {
            if let Some(index) = self.append_keyframe(id, duration, easing, &KeyframePatch::new()) {
                added += 1;
                if Some(id) == primary {
                    self.selection.set_active_keyframe(Some(index));
                }
            }
        }
        added
    }

    /// Merge fields into one keyframe
    pub fn update_keyframe(&mut self, id: ObjectId, index: usize, patch: &KeyframePatch) -> bool {
        let result = self.timeline.update_keyframe(id, index, patch);
        accepted("update_keyframe", result.map_err(EditError::from)).is_some()
    }

    /// Merge fields into the primary object's active keyframe
    pub fn update_active_keyframe(&mut self, patch: &KeyframePatch) -> bool {
        match (self.selection.primary(), self.selection.active_keyframe()) {
            (Some(id), Some(index)) => self.update_keyframe(id, index, patch),
            _ => {
                tracing::debug!("update_active_keyframe ignored: {}", EditError::NothingSelected);
                false
            }
        }
    }

    /// Delete a keyframe other than the first
    pub fn delete_keyframe(&mut self, id: ObjectId, index: usize) -> bool {
        let result = self.timeline.delete_keyframe(id, index);
        if accepted("delete_keyframe", result.map_err(EditError::from)).is_none() {
            return false;
        }
        self.selection.keyframe_removed(id, index);
        true
    }

    /// Delete an object, purging it from the selection and clipboard
    pub fn delete_object(&mut self, id: ObjectId) -> bool {
        let Some(object) = self.timeline.remove_object(id) else {
            tracing::debug!("delete_object ignored: object {} not found", id);
            return false;
        };
        self.selection.remove(id);
        self.clipboard.purge(id);
        if !self.gesture.is_idle() {
            self.cancel_gesture();
        }
        tracing::info!("Deleted {}", object.name);
        true
    }

    /// Delete every selected object. Returns how many were deleted.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.ids().to_vec();
        let deleted = ids.into_iter().filter(|id| self.delete_object(*id)).count();
        self.selection.clear();
        deleted
    }

    /// Change the timeline length, keeping the play cursor inside it
    pub fn set_duration(&mut self, duration: f32) {
        self.timeline.duration = duration.max(0.0);
        if self.playback.time() > self.timeline.duration {
            self.playback
                .seek(self.playback.time(), self.timeline.duration, self.clock.now());
        }
    }

    /// Click on an object
    pub fn click_object(&mut self, id: ObjectId, modifiers: Modifiers) -> bool {
        if modifiers.toggle {
            self.selection.toggle_click(id, &self.timeline)
        } else {
            self.selection.click(id, &self.timeline)
        }
    }

    /// Replace the selection with every object resting inside `region`
    pub fn select_region(&mut self, region: Rect) -> usize {
        self.selection.select_region(region, &self.timeline)
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Choose which of the primary object's keyframes is being edited
    pub fn set_active_keyframe(&mut self, index: usize) -> bool {
        let count = self
            .selection
            .primary()
            .and_then(|id| self.timeline.object(id))
            .map_or(0, |o| o.keyframe_count());
        if index >= count {
            tracing::debug!("set_active_keyframe ignored: index {} of {}", index, count);
            return false;
        }
        self.selection.set_active_keyframe(Some(index));
        true
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.playback.is_playing() {
            Err(EditError::Playing)
        } else {
            Ok(())
        }
    }

    fn set_gesture(&mut self, gesture: Gesture) {
        tracing::debug!("Gesture {} -> {}", self.gesture.name(), gesture.name());
        self.gesture = gesture;
    }

    /// Press on keyframe `index` of an object.
    ///
    /// With the toggle modifier this only flips the object's selection.
    /// Otherwise the object joins the selection if needed, the keyframe
    /// becomes active and a group drag starts.
    pub fn press_object(&mut self, id: ObjectId, index: usize, pointer: Pos2, modifiers: Modifiers) -> bool {
        if modifiers.toggle {
            return self.click_object(id, modifiers);
        }

        // Pressing an unselected object drags it alone
        let joins = !self.selection.contains(id);
        let group = if joins { vec![id] } else { self.selection.ids().to_vec() };
        let result = self
            .ensure_editable()
            .and_then(|()| DragSnapshot::capture(&self.timeline, &group, id, index, pointer));
        let Some(snapshot) = accepted("press_object", result) else {
            return false;
        };

        if joins {
            self.selection.click(id, &self.timeline);
        }
        if self.selection.primary() == Some(id) {
            self.selection.set_active_keyframe(Some(index));
        }
        self.set_gesture(Gesture::Dragging(snapshot));
        true
    }

    /// Press on an object's resize handle
    pub fn press_resize_handle(&mut self, id: ObjectId, index: usize, pointer: Pos2) -> bool {
        let result = self
            .ensure_editable()
            .and_then(|()| ResizeSnapshot::capture(&self.timeline, id, index, pointer, &self.settings));
        let Some(snapshot) = accepted("press_resize_handle", result) else {
            return false;
        };

        if !self.selection.contains(id) {
            self.selection.click(id, &self.timeline);
        }
        self.set_gesture(Gesture::Resizing(snapshot));
        true
    }

    /// Press on empty canvas: clears the selection unless toggling and
    /// starts a marquee
    pub fn press_background(&mut self, pointer: Pos2, modifiers: Modifiers) -> bool {
        if let Err(e) = self.ensure_editable() {
            tracing::debug!("press_background ignored: {}", e);
            return false;
        }
        if !modifiers.toggle {
            self.selection.clear();
        }
        self.set_gesture(Gesture::MarqueeSelecting(Marquee::new(pointer)));
        true
    }

    /// Pointer moved. Returns whether anything changed.
    pub fn pointer_move(&mut self, pointer: Pos2) -> bool {
        match &mut self.gesture {
            Gesture::Idle => false,
            Gesture::Dragging(snapshot) => snapshot.apply(&mut self.timeline, pointer) > 0,
            Gesture::Resizing(snapshot) => {
                let result = snapshot.apply(&mut self.timeline, pointer, &self.settings);
                accepted("resize", result).is_some()
            }
            Gesture::MarqueeSelecting(marquee) => {
                marquee.current = pointer;
                true
            }
        }
    }

    /// Pointer released: finish the gesture. A marquee only selects when it
    /// exceeds the minimum size.
    pub fn release(&mut self) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        tracing::debug!("Gesture {} -> idle", gesture.name());
        match gesture {
            Gesture::Idle => false,
            Gesture::MarqueeSelecting(marquee) => {
                if marquee.exceeds(self.settings.marquee_min_size) {
                    self.select_region(marquee.rect());
                }
                true
            }
            Gesture::Dragging(_) | Gesture::Resizing(_) => true,
        }
    }

    /// Abandon the gesture without finishing it
    pub fn cancel_gesture(&mut self) {
        self.set_gesture(Gesture::Idle);
    }

    /// Copy the selected objects. Returns how many were copied.
    pub fn copy_selection(&mut self) -> usize {
        if self.selection.is_empty() {
            tracing::debug!("copy_selection ignored: {}", EditError::NothingSelected);
            return 0;
        }
        self.clipboard.copy_objects(&self.timeline, self.selection.ids())
    }

    /// Copy one keyframe
    pub fn copy_keyframe(&mut self, id: ObjectId, index: usize) -> bool {
        let result = self.clipboard.copy_keyframe(&self.timeline, id, index);
        accepted("copy_keyframe", result).is_some()
    }

    /// Copy the primary object's active keyframe
    pub fn copy_active_keyframe(&mut self) -> bool {
        match (self.selection.primary(), self.selection.active_keyframe()) {
            (Some(id), Some(index)) => self.copy_keyframe(id, index),
            _ => {
                tracing::debug!("copy_active_keyframe ignored: {}", EditError::NothingSelected);
                false
            }
        }
    }

    /// Paste the clipboard.
    ///
    /// Objects are inserted offset from their originals and become the
    /// selection. A keyframe is appended to the primary selected object.
    pub fn paste(&mut self) -> bool {
        let result = match self.clipboard.content() {
            ClipboardContent::Objects(_) => self.paste_objects().map(|_| ()),
            ClipboardContent::Keyframe(_) => self
                .selection
                .primary()
                .ok_or(EditError::NothingSelected)
                .and_then(|id| self.paste_keyframe(id))
                .map(|_| ()),
            ClipboardContent::Empty => Err(EditError::NothingToPaste),
        };
        accepted("paste", result).is_some()
    }

    fn paste_objects(&mut self) -> Result<Vec<ObjectId>> {
        let ids = self.clipboard.paste_objects(&mut self.timeline, self.settings.paste_offset)?;
        let active = ids
            .first()
            .and_then(|id| self.timeline.object(*id))
            .map(|o| o.last_index());
        self.selection.replace(ids.iter().copied(), active);
        Ok(ids)
    }

    fn paste_keyframe(&mut self, target: ObjectId) -> Result<usize> {
        let index = self.clipboard.paste_keyframe(&mut self.timeline, target)?;
        if self.selection.primary() == Some(target) {
            self.selection.set_active_keyframe(Some(index));
        }
        Ok(index)
    }

    /// Start playing from the cursor. Any gesture in progress is dropped.
    pub fn play(&mut self) -> bool {
        if self.playback.is_playing() {
            return false;
        }
        if !self.gesture.is_idle() {
            self.cancel_gesture();
        }
        self.playback.play(self.clock.now());
        tracing::info!("Playback started at {:.2}s", self.playback.time());
        true
    }

    /// Pause at the cursor
    pub fn pause(&mut self) -> bool {
        if !self.playback.is_playing() {
            return false;
        }
        self.playback.pause();
        tracing::info!("Playback paused at {:.2}s", self.playback.time());
        true
    }

    /// Stop and rewind
    pub fn stop(&mut self) {
        self.playback.stop();
    }

    /// Toggle play/pause
    pub fn toggle_playback(&mut self) {
        if !self.pause() {
            self.play();
        }
    }

    /// Scrub the cursor. Returns the clamped cursor.
    pub fn seek(&mut self, time: f32) -> f32 {
        self.playback.seek(time, self.timeline.duration, self.clock.now());
        self.playback.time()
    }

    /// Advance playback from the clock
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.playback.tick(self.clock.now(), self.timeline.duration);
        if outcome == TickOutcome::Finished {
            tracing::info!("Playback finished");
        }
        outcome
    }

    /// An object's state at `time`
    pub fn resolve(&self, id: ObjectId, time: f32) -> Option<VisualState> {
        self.timeline.resolve(id, time)
    }

    /// What the canvas should draw right now
    pub fn render_frame(&self) -> Frame {
        let selection = &self.selection;
        if self.playback.is_playing() {
            Frame::playing(&self.timeline, self.playback.time(), |id| selection.contains(id))
        } else {
            Frame::editing(&self.timeline, self.playback.time(), |id| selection.contains(id))
        }
    }

    /// Serializable view of the timeline
    pub fn export_document(&self) -> TimelineDocument {
        TimelineDocument::from(&self.timeline)
    }

    /// Replace the timeline with a document.
    ///
    /// Selection, clipboard, gesture and playback are reset. On error the
    /// session is unchanged.
    pub fn load_document(&mut self, document: TimelineDocument) -> std::result::Result<(), DocumentError> {
        let timeline = document.into_timeline(self.settings.timeline.clone())?;
        tracing::info!("Loaded document with {} objects", timeline.len());
        self.timeline = timeline;
        self.selection.clear();
        self.clipboard.clear();
        self.playback.stop();
        self.gesture = Gesture::Idle;
        Ok(())
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}
