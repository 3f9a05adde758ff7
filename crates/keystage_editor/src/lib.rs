// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keystage editor core.
//!
//! Everything between raw pointer/keyboard events and the timeline:
//! - Selection with a primary object and an active keyframe
//! - A pointer gesture state machine (drag, resize, marquee)
//! - Group drag and resize transforms
//! - An object/keyframe clipboard
//! - Playback driven by a tokio task
//!
//! ## Architecture
//!
//! [`EditorSession`] owns the timeline and all editing state. The canvas
//! shell feeds it events in canvas-local coordinates and draws the
//! [`Frame`] it returns. When shared with the [`PlaybackScheduler`] the
//! session lives behind a mutex, so mutations stay serialized.

pub mod clipboard;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod scheduler;
pub mod selection;
pub mod session;
pub mod settings;
pub mod transform;

pub use clipboard::{Clipboard, ClipboardContent, CopiedObject};
pub use error::EditError;
pub use frame::{Frame, GhostPose, RenderedObject};
pub use gesture::{Gesture, Marquee, Modifiers};
pub use scheduler::{PlaybackEvent, PlaybackScheduler, TokioClock};
pub use selection::Selection;
pub use session::{EditorSession, SharedSession};
pub use settings::{EditorSettings, SettingsError, SETTINGS_FILE_NAME};
pub use transform::{DragSnapshot, DragTarget, ResizeSnapshot};
