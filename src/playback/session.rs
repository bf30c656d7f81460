//! The authoritative "what is happening right now" state.
//!
//! Fields are read through accessors; only the player mutates them.

use std::time::{Duration, Instant};

use crate::library::Track;

use super::sleep_timer::SleepTimer;
use super::visibility::Visibility;

/// Transport state. `Playing` is intent, not hardware truth.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

#[derive(Debug, Default)]
pub struct PlaybackSession {
    active_track: Option<Track>,
    state: PlaybackState,
    current_time: f64,
    duration: f64,
    scrub: Option<f64>,
    visibility: Visibility,
    sleep_timer: SleepTimer,
}

impl PlaybackSession {
    pub fn track(&self) -> Option<&Track> {
        self.active_track.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Last known hardware position.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Position shown to the user: the drag position while scrubbing.
    pub fn displayed_time(&self) -> f64 {
        self.scrub.unwrap_or(self.current_time)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrub.is_some()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn sleep_timer(&self) -> &SleepTimer {
        &self.sleep_timer
    }

    /// Clamp to `[0, duration]`; passes through (non-negative) while the
    /// duration is still unknown.
    pub fn clamp(&self, seconds: f64) -> f64 {
        let seconds = seconds.max(0.0);
        if self.duration > 0.0 {
            seconds.min(self.duration)
        } else {
            seconds
        }
    }

    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        let shown = self.displayed_time();
        let progress = if self.duration > 0.0 {
            (shown / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        SessionSnapshot {
            track: self.active_track.clone(),
            state: self.state,
            is_playing: self.is_playing(),
            current_time: shown,
            duration: self.duration,
            progress,
            visibility: self.visibility,
            scrubbing: self.is_scrubbing(),
            sleep_remaining: self.sleep_timer.remaining(now),
        }
    }

    /// Install a new track: timing fields reset, transport stopped.
    pub(super) fn replace_track(&mut self, track: Track, visibility: Visibility) {
        self.active_track = Some(track);
        self.state = PlaybackState::Stopped;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.scrub = None;
        self.visibility = visibility;
    }

    /// Same playback target, updated descriptive fields.
    pub(super) fn refresh_track(&mut self, track: Track) {
        self.active_track = Some(track);
    }

    pub(super) fn set_state(&mut self, state: PlaybackState) {
        if self.active_track.is_some() {
            self.state = state;
        }
    }

    pub(super) fn set_position(&mut self, seconds: f64) {
        if seconds.is_finite() {
            self.current_time = self.clamp(seconds);
        }
    }

    pub(super) fn set_duration(&mut self, seconds: f64) {
        if self.active_track.is_none() || !seconds.is_finite() || seconds <= 0.0 {
            return;
        }
        self.duration = seconds;
        self.current_time = self.clamp(self.current_time);
        self.scrub = self.scrub.map(|s| self.clamp(s));
    }

    pub(super) fn set_scrub(&mut self, at: Option<f64>) {
        self.scrub = at.map(|s| self.clamp(s));
    }

    pub(super) fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility.constrained(self.state, self.active_track.is_some());
    }

    pub(super) fn sleep_timer_mut(&mut self) -> &mut SleepTimer {
        &mut self.sleep_timer
    }

    /// Full teardown to the empty session.
    pub(super) fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub track: Option<Track>,
    pub state: PlaybackState,
    pub is_playing: bool,
    /// Displayed position (follows the drag while scrubbing).
    pub current_time: f64,
    pub duration: f64,
    pub progress: f64,
    pub visibility: Visibility,
    pub scrubbing: bool,
    pub sleep_remaining: Option<Duration>,
}
