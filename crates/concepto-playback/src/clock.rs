//! Wall-clock playback position.
//!
//! Cooperative state machine driven by the host's frame scheduler. The
//! clock never spawns a timer; `tick` is called once per frame with the
//! current instant and advances the position by real elapsed time, so a
//! stalled frame loop produces a correct jump instead of slow-motion
//! playback.

use std::time::Instant;

use concepto_core::Seconds;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Playing,
}

/// Playback position over the timeline, in seconds.
#[derive(Debug)]
pub struct PlaybackClock {
    state: ClockState,
    position: Seconds,
    /// Instant of the previous tick while playing.
    origin: Option<Instant>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            state: ClockState::Stopped,
            position: 0.0,
            origin: None,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == ClockState::Playing
    }

    /// Current playback position.
    pub fn position(&self) -> Seconds {
        self.position
    }

    /// Start (or resume) playback from the current position.
    pub fn play(&mut self, now: Instant) {
        if self.state == ClockState::Playing {
            return;
        }
        self.state = ClockState::Playing;
        self.origin = Some(now);
        info!(position = self.position, "playback started");
    }

    /// Pause, retaining the current position.
    pub fn pause(&mut self) {
        self.state = ClockState::Stopped;
        self.origin = None;
    }

    /// Stop and rewind to zero.
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.origin = None;
        self.position = 0.0;
    }

    /// Advance by the wall-clock time since the previous tick, clamped
    /// to `total`. Returns whether another frame should be scheduled;
    /// reaching the end stops the clock and rewinds it, and the final
    /// `false` tells the host to cancel frame scheduling.
    pub fn tick(&mut self, now: Instant, total: Seconds) -> bool {
        if self.state != ClockState::Playing {
            return false;
        }
        let origin = self.origin.unwrap_or(now);
        self.position += now.saturating_duration_since(origin).as_secs_f64();
        self.origin = Some(now);

        if self.position >= total {
            self.position = 0.0;
            self.state = ClockState::Stopped;
            self.origin = None;
            info!(total, "playback reached the end");
            return false;
        }
        true
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}
