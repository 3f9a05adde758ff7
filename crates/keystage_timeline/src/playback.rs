// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback cursor driven by a monotonic clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source consumed by playback
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: AtomicU64,
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: AtomicU64::new(0),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.offset_nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    /// Move the clock forward by fractional seconds
    pub fn advance_secs(&self, secs: f32) {
        self.advance(Duration::try_from_secs_f32(secs).unwrap_or_default());
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

/// Instant at which a cursor of `time` seconds would have started playing
fn anchor_for(now: Instant, time: f32) -> Instant {
    Duration::try_from_secs_f32(time)
        .ok()
        .and_then(|offset| now.checked_sub(offset))
        .unwrap_or(now)
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Stopped at the beginning
    #[default]
    Stopped,
    /// Playing forward
    Playing,
    /// Paused at the cursor
    Paused,
}

/// Result of one scheduler tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Cursor moved to this time; schedule another tick
    Advanced(f32),
    /// Timeline end reached; playback stopped and rewound
    Finished,
    /// Not playing; nothing to do
    Idle,
}

/// Playback controller for a timeline
#[derive(Debug, Clone, Default)]
pub struct PlaybackController {
    /// Current play cursor in seconds
    time: f32,
    /// Playback state
    state: PlaybackState,
    /// Instant that corresponds to cursor position zero
    anchor: Option<Instant>,
}

impl PlaybackController {
    /// Create a stopped controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Current play cursor
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Is currently playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Play from the current cursor
    pub fn play(&mut self, now: Instant) {
        if self.is_playing() {
            return;
        }
        self.anchor = Some(anchor_for(now, self.time));
        self.state = PlaybackState::Playing;
    }

    /// Pause at the current cursor
    pub fn pause(&mut self) {
        if self.is_playing() {
            self.state = PlaybackState::Paused;
        }
        self.anchor = None;
    }

    /// Stop and rewind to the beginning
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;
        self.anchor = None;
    }

    /// Toggle play/pause
    pub fn toggle(&mut self, now: Instant) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(now);
        }
    }

    /// Move the cursor (scrubbing), clamped to `[0, duration]`
    pub fn seek(&mut self, time: f32, duration: f32, now: Instant) {
        self.time = time.clamp(0.0, duration.max(0.0));
        if self.is_playing() {
            self.anchor = Some(anchor_for(now, self.time));
        }
    }

    /// Advance the cursor from the recorded anchor
    pub fn tick(&mut self, now: Instant, duration: f32) -> TickOutcome {
        let (PlaybackState::Playing, Some(anchor)) = (self.state, self.anchor) else {
            return TickOutcome::Idle;
        };

        let elapsed = now.saturating_duration_since(anchor).as_secs_f32();
        if elapsed >= duration {
            self.stop();
            TickOutcome::Finished
        } else {
            self.time = elapsed;
            TickOutcome::Advanced(elapsed)
        }
    }
}
