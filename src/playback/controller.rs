use std::mem;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::ChromeSettings;
use crate::error::PlaybackError;
use crate::library::Track;
use crate::media::{BindOutcome, MediaBackend, MediaBinding, MediaEventKind};

use super::guard::{Settlement, TransactionGuard};
use super::session::{PlaybackSession, PlaybackState, SessionSnapshot};
use super::visibility::Visibility;

/// Public operation surface over the session, the binding and the guard.
///
/// Hardware calls are only issued from [`Player::set_playing`] when the
/// playing intent actually flips, so repeated requests never double-invoke
/// the handle. Media events are applied by [`Player::pump`].
pub struct Player {
    session: PlaybackSession,
    binding: MediaBinding,
    guard: TransactionGuard,
    open_in: Visibility,
    /// The current handle has started at least once.
    has_started: bool,
    notices: Vec<PlaybackError>,
}

impl Player {
    pub fn new(backend: Box<dyn MediaBackend>, chrome: &ChromeSettings) -> Self {
        Self {
            session: PlaybackSession::default(),
            binding: MediaBinding::new(backend),
            guard: TransactionGuard::new(),
            open_in: chrome.open_in.into(),
            has_started: false,
            notices: Vec::new(),
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        self.session.snapshot(now)
    }

    /// Errors surfaced since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<PlaybackError> {
        mem::take(&mut self.notices)
    }

    /// Load `track` in the configured chrome and start playing it.
    pub fn load_and_play(&mut self, track: Track) -> Result<(), PlaybackError> {
        self.load_and_play_in(track, self.open_in)
    }

    /// Load `track` and start playing it, showing `visibility` chrome.
    ///
    /// A track with the same url as the loaded one keeps the handle and the
    /// position; only its descriptive fields are refreshed.
    pub fn load_and_play_in(
        &mut self,
        track: Track,
        visibility: Visibility,
    ) -> Result<(), PlaybackError> {
        if !track.is_playable() {
            debug!("refusing to load {:?}: no url", track.name);
            return Err(PlaybackError::TrackUnplayable { name: track.name });
        }

        if self.session.track().is_some_and(|t| t.same_target(&track)) {
            debug!("reload of {:?} keeps the current handle", track.name);
            self.session.refresh_track(track);
            self.set_playing(true);
            self.session.set_visibility(visibility);
            return Ok(());
        }

        if self.session.track().is_some() {
            self.session.sleep_timer_mut().disarm();
        }
        // In-flight starts belong to the handle about to be torn down.
        self.guard.reset();
        self.has_started = false;
        self.session.replace_track(track, visibility);

        match self.binding.bind(self.session.track()) {
            BindOutcome::Failed(err) => self.start_failed(err.to_string()),
            _ => self.set_playing(true),
        }
        self.session.set_visibility(visibility);
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) {
        if self.session.track().is_none() {
            return;
        }
        let playing = self.session.is_playing();
        self.set_playing(!playing);
    }

    /// Jump to `seconds`, clamped to the track. The displayed position
    /// changes at once; the hardware follows.
    pub fn seek(&mut self, seconds: f64) {
        if self.session.track().is_none() || !seconds.is_finite() {
            return;
        }
        let target = self.session.clamp(seconds);
        self.session.set_position(target);
        self.binding.seek(target);
    }

    /// Start a drag gesture. Position sampling is suspended until it ends.
    pub fn begin_scrub(&mut self, seconds: f64) {
        if self.session.track().is_some() && seconds.is_finite() {
            self.session.set_scrub(Some(seconds));
        }
    }

    pub fn update_scrub(&mut self, seconds: f64) {
        if self.session.is_scrubbing() && seconds.is_finite() {
            self.session.set_scrub(Some(seconds));
        }
    }

    /// Release the drag at `seconds` and commit it as a seek.
    pub fn end_scrub(&mut self, seconds: f64) {
        self.session.set_scrub(None);
        self.seek(seconds);
    }

    /// Send the player to the background without stopping playback.
    pub fn close(&mut self) {
        let demoted = Visibility::demoted(self.session.state(), self.session.track().is_some());
        self.session.set_visibility(demoted);
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.session.set_visibility(visibility);
    }

    /// Tear everything down: handle released, track and timer cleared.
    pub fn stop_and_close(&mut self) {
        self.guard.reset();
        self.binding.pause();
        self.binding.bind(None);
        self.has_started = false;
        self.session.clear();
        debug!("session closed");
    }

    /// Arm the sleep timer for `minutes` from `now`; `None` disarms.
    pub fn arm_sleep_timer(&mut self, minutes: Option<f64>, now: Instant) {
        self.session.sleep_timer_mut().arm(minutes, now);
        match self.session.sleep_timer().minutes() {
            Some(m) => info!("sleep timer armed for {m} min"),
            None => info!("sleep timer off"),
        }
    }

    pub fn sleep_timer_remaining(&self, now: Instant) -> Option<Duration> {
        self.session.sleep_timer().remaining(now)
    }

    /// Periodic work: end-of-media detection, pending events, position
    /// sampling and sleep-timer evaluation.
    pub fn tick(&mut self, now: Instant) {
        self.binding.poll();
        self.pump();
        self.sample_position();
        self.check_sleep_timer(now);
    }

    /// Apply every pending event from the live handle.
    pub fn pump(&mut self) {
        loop {
            let events = self.binding.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                self.apply_media_event(event.kind);
            }
        }
    }

    /// Fade out and tear down before the process exits.
    pub fn shutdown(&mut self, fade: Duration) {
        self.binding.fade_out(fade);
        self.stop_and_close();
    }

    fn apply_media_event(&mut self, kind: MediaEventKind) {
        match kind {
            MediaEventKind::MetadataReady { duration } => self.session.set_duration(duration),
            MediaEventKind::StartSettled { ticket, result } => {
                let settlement = self.guard.settle(ticket, result);
                self.apply_settlement(settlement);
            }
            MediaEventKind::Ended => self.finished(),
            MediaEventKind::Failed { reason } => self.runtime_failed(reason),
        }
    }

    fn apply_settlement(&mut self, settlement: Settlement) {
        match settlement {
            Settlement::Started => self.has_started = true,
            Settlement::Reissue(ticket) => {
                debug!("issuing queued start {ticket}");
                if !self.binding.start(ticket) {
                    self.guard.reset();
                }
            }
            Settlement::Reconcile => {
                debug!("superseded start reached the hardware; pausing again");
                self.binding.pause();
            }
            Settlement::Stale | Settlement::Discarded => {
                debug!("start superseded");
            }
            Settlement::Failed(err) => {
                self.binding.pause();
                self.start_failed(err.to_string());
            }
        }
    }

    /// The only place hardware start/pause is requested for transport changes.
    fn set_playing(&mut self, playing: bool) {
        if playing == self.session.is_playing() || self.session.track().is_none() {
            return;
        }
        if playing {
            if !self.ensure_bound() {
                return;
            }
            self.session.set_state(PlaybackState::Playing);
            // A running transport cannot stay fully hidden.
            self.session.set_visibility(self.session.visibility());
            if let Some(ticket) = self.guard.request_start() {
                self.binding.start(ticket);
            }
        } else {
            self.session.set_state(PlaybackState::Paused);
            self.guard.request_stop();
            self.binding.pause();
        }
    }

    /// Reopen the session track if an earlier open failed.
    fn ensure_bound(&mut self) -> bool {
        if self.binding.current_id().is_some() {
            return true;
        }
        match self.binding.bind(self.session.track()) {
            BindOutcome::Failed(err) => {
                self.start_failed(err.to_string());
                false
            }
            _ => self.binding.current_id().is_some(),
        }
    }

    fn start_failed(&mut self, reason: String) {
        let state = if self.has_started {
            PlaybackState::Paused
        } else {
            PlaybackState::Stopped
        };
        self.session.set_state(state);
        let track = self.track_name();
        warn!("could not start {track:?}: {reason}");
        self.notices.push(PlaybackError::StartFailed { track, reason });
    }

    fn runtime_failed(&mut self, reason: String) {
        if self.session.track().is_none() {
            return;
        }
        self.guard.request_stop();
        self.binding.pause();
        if self.session.is_playing() {
            self.session.set_state(PlaybackState::Paused);
        }
        let track = self.track_name();
        warn!("playback of {track:?} failed: {reason}");
        self.notices.push(PlaybackError::Runtime { track, reason });
    }

    /// Natural end of media: stop, rewind, keep the track for replay.
    fn finished(&mut self) {
        if self.session.track().is_none() {
            return;
        }
        debug!("reached end of {:?}", self.track_name());
        self.guard.request_stop();
        self.binding.pause();
        self.binding.seek(0.0);
        self.session.set_state(PlaybackState::Stopped);
        self.session.set_scrub(None);
        self.session.set_position(0.0);
    }

    fn sample_position(&mut self) {
        if !self.session.is_playing() || self.session.is_scrubbing() {
            return;
        }
        if let Some(position) = self.binding.position() {
            self.session.set_position(position);
        }
    }

    fn check_sleep_timer(&mut self, now: Instant) {
        if !self.session.is_playing() || self.session.track().is_none() {
            return;
        }
        if self.session.sleep_timer().is_expired(now) {
            info!("sleep timer elapsed; pausing");
            self.session.sleep_timer_mut().disarm();
            self.set_playing(false);
        }
    }

    fn track_name(&self) -> String {
        self.session
            .track()
            .map(|t| t.name.clone())
            .unwrap_or_default()
    }
}
