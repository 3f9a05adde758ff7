// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback loop on the tokio runtime.
//!
//! A single task sleeps one frame interval, ticks the shared session and
//! publishes the resulting frame. Starting again replaces the task, so at
//! most one tick is ever pending.

use crate::frame::Frame;
use crate::session::SharedSession;
use keystage_timeline::{Clock, TickOutcome};
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Clock that follows tokio's timer, including paused test time
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Message from the playback loop
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// The cursor moved; draw this
    Frame(Frame),
    /// The end of the timeline was reached and playback rewound
    Finished,
}

/// Owner of the playback task
#[derive(Debug)]
pub struct PlaybackScheduler {
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl PlaybackScheduler {
    /// Create a scheduler that spawns onto `runtime`
    pub fn new(runtime: Handle) -> Self {
        Self { runtime, task: None }
    }

    /// Create a scheduler on the current runtime, if inside one
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Whether a playback task is alive
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start playing the session and stream frames to `events`.
    ///
    /// Any previous task is cancelled first. Returns false when the session
    /// refused to play.
    pub fn start(&mut self, session: SharedSession, events: UnboundedSender<PlaybackEvent>) -> bool {
        self.cancel();

        let interval = {
            let mut session = session.lock();
            session.play();
            if !session.playback().is_playing() {
                return false;
            }
            session.settings().frame_interval()
        };

        self.task = Some(self.runtime.spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                let event = {
                    let mut session = session.lock();
                    match session.tick() {
                        TickOutcome::Advanced(_) => PlaybackEvent::Frame(session.render_frame()),
                        TickOutcome::Finished => PlaybackEvent::Finished,
                        TickOutcome::Idle => break,
                    }
                };

                let finished = event == PlaybackEvent::Finished;
                if events.send(event).is_err() || finished {
                    break;
                }
            }
            tracing::debug!("Playback task exited");
        }));
        true
    }

    /// Pause the session and cancel the pending tick. Idempotent.
    pub fn stop(&mut self, session: &SharedSession) {
        self.cancel();
        session.lock().pause();
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EditorSession;
    use crate::settings::EditorSettings;
    use keystage_timeline::PlaybackState;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn shared_session(duration: f32) -> SharedSession {
        let mut session = EditorSession::with_clock(EditorSettings::default(), Arc::new(TokioClock));
        session.set_duration(duration);
        session.into_shared()
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_to_the_end() {
        let session = shared_session(1.0);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = PlaybackScheduler::new(Handle::current());
        assert!(scheduler.start(session.clone(), tx));

        let mut frames = 0;
        let mut last_time = 0.0;
        while let Some(event) = rx.recv().await {
            match event {
                PlaybackEvent::Frame(frame) => {
                    assert!(frame.playing);
                    assert!(frame.time >= last_time);
                    last_time = frame.time;
                    frames += 1;
                }
                PlaybackEvent::Finished => break,
            }
        }

        assert!(frames > 30);
        let session = session.lock();
        assert_eq!(session.playback().state(), PlaybackState::Stopped);
        assert_eq!(session.playback().time(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let session = shared_session(10.0);
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut scheduler = PlaybackScheduler::new(Handle::current());
        scheduler.start(session.clone(), tx);

        tokio::time::sleep(Duration::from_millis(100)).await;
        scheduler.stop(&session);
        scheduler.stop(&session);

        assert!(!scheduler.is_running());
        let paused_at = session.lock().playback().time();
        assert!(paused_at > 0.0);
        assert_eq!(session.lock().playback().state(), PlaybackState::Paused);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(session.lock().playback().time(), paused_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_task() {
        let session = shared_session(10.0);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = PlaybackScheduler::new(Handle::current());

        assert!(scheduler.start(session.clone(), tx.clone()));
        assert!(scheduler.start(session.clone(), tx));
        assert!(scheduler.is_running());

        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.stop(&session);

        // One frame per interval, not two
        let mut frames = 0;
        while let Ok(PlaybackEvent::Frame(_)) = rx.try_recv() {
            frames += 1;
        }
        assert!((2..=3).contains(&frames));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_receiver_ends_task() {
        let session = shared_session(10.0);
        let (tx, rx) = mpsc::unbounded_channel();
        let mut scheduler = PlaybackScheduler::new(Handle::current());
        scheduler.start(session.clone(), tx);
        drop(rx);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!scheduler.is_running());
    }
}
