use std::time::Instant;

use crate::error::PlaybackError;

use super::PlaybackState;

/// What a single tick did to the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Not playing; nothing changed.
    Idle,
    /// Cursor moved to the contained time.
    Advanced(f64),
    /// Cursor reached the end and playback stopped.
    Finished,
}

/// Advances the cursor by wall-clock time scaled by speed.
///
/// All timing goes through explicit `Instant`s so the clock can be driven
/// by any frame source, and by fixed instants in tests.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: PlaybackState,
    duration: f64,
    /// Timestamp of the previous tick while playing; elapsed time is measured
    /// from here rather than assuming a fixed frame interval.
    last_tick: Option<Instant>,
}

impl PlaybackClock {
    pub fn new(duration: f64) -> Self {
        Self {
            state: PlaybackState::default(),
            duration,
            last_tick: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn current_time(&self) -> f64 {
        self.state.current_time
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Starts playback from the cursor. At the very end the cursor rewinds
    /// to zero first, otherwise playback would stop on the next tick.
    pub fn play(&mut self, now: Instant) {
        if self.state.current_time >= self.duration {
            self.state.current_time = 0.0;
        }
        self.state.is_playing = true;
        self.last_tick = Some(now);
    }

    pub fn pause(&mut self) {
        self.state.is_playing = false;
        self.last_tick = None;
    }

    /// Returns the new playing flag.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.state.is_playing {
            self.pause();
        } else {
            self.play(now);
        }
        self.state.is_playing
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.state.is_playing {
            return TickOutcome::Idle;
        }

        let elapsed = self
            .last_tick
            .map(|previous| now.saturating_duration_since(previous).as_secs_f64())
            .unwrap_or(0.0);
        self.last_tick = Some(now);

        let next = self.state.current_time + elapsed * self.state.speed;
        if next >= self.duration {
            self.state.current_time = self.duration;
            self.pause();
            TickOutcome::Finished
        } else {
            self.state.current_time = next;
            TickOutcome::Advanced(next)
        }
    }

    /// Takes effect on the next tick; the cursor does not move.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), PlaybackError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PlaybackError::InvalidSpeed(speed));
        }
        self.state.speed = speed;
        Ok(())
    }

    /// Moves the cursor, clamped to the signal. Play/pause is unchanged.
    pub fn seek(&mut self, time: f64) -> f64 {
        let time = if time.is_nan() { 0.0 } else { time };
        self.state.current_time = time.clamp(0.0, self.duration);
        self.state.current_time
    }

    pub fn skip(&mut self, delta: f64) -> f64 {
        self.seek(self.state.current_time + delta)
    }

    /// Back to `(0, paused, 1x)` for a new signal.
    pub fn reset(&mut self, duration: f64) {
        *self = Self::new(duration);
    }
}
