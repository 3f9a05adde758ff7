// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe timeline for the Keystage animation editor.
//!
//! This crate provides the animation data model:
//! - Shapes with ordered keyframe sequences
//! - Easing curves
//! - Time-based state resolution (interpolation)
//! - Playback control
//! - A serializable document view
//!
//! ## Architecture
//!
//! Every object owns at least one keyframe; the first keyframe starts at
//! time zero and is never removed. Keyframes are only appended, so the
//! sequence stays ordered by start time and the interpolation engine can
//! work on it without sorting.

pub mod config;
pub mod document;
pub mod easing;
pub mod interpolation;
pub mod keyframe;
pub mod object;
pub mod playback;
pub mod timeline;

pub use config::TimelineConfig;
pub use document::{DocumentError, ObjectDocument, TimelineDocument};
pub use easing::{ease, Easing};
pub use interpolation::{resolve, VisualState};
pub use keyframe::{Keyframe, KeyframePatch};
pub use object::{AnimatedObject, ObjectId, ResizeMode, ShapeKind};
pub use playback::{Clock, ManualClock, PlaybackController, PlaybackState, SystemClock, TickOutcome};
pub use timeline::{Timeline, TimelineError};
