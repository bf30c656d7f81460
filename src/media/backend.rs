//! Platform seam: what the player needs from a media handle, and how the
//! handle reports back.

use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::error::{BackendError, StartError};
use crate::library::MediaKind;

/// Identity of one platform handle; never reused within a binding.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HandleId(pub(crate) u64);

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEventKind {
    /// Duration became known, in seconds.
    MetadataReady { duration: f64 },
    /// A start request issued with `ticket` completed or failed.
    StartSettled {
        ticket: u64,
        result: Result<(), StartError>,
    },
    /// Natural end of media.
    Ended,
    /// Hardware error after playback had started.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub handle: HandleId,
    pub kind: MediaEventKind,
}

/// Sending half given to a handle so it can report asynchronously.
#[derive(Debug, Clone)]
pub struct EventTap {
    handle: HandleId,
    tx: Sender<MediaEvent>,
}

impl EventTap {
    pub(crate) fn new(handle: HandleId, tx: Sender<MediaEvent>) -> Self {
        Self { handle, tx }
    }

    pub fn metadata_ready(&self, duration: f64) {
        self.emit(MediaEventKind::MetadataReady { duration });
    }

    pub fn start_settled(&self, ticket: u64, result: Result<(), StartError>) {
        self.emit(MediaEventKind::StartSettled { ticket, result });
    }

    pub fn ended(&self) {
        self.emit(MediaEventKind::Ended);
    }

    pub fn failed(&self, reason: impl Into<String>) {
        self.emit(MediaEventKind::Failed {
            reason: reason.into(),
        });
    }

    fn emit(&self, kind: MediaEventKind) {
        // The binding may already be gone during shutdown.
        let _ = self.tx.send(MediaEvent {
            handle: self.handle,
            kind,
        });
    }
}

/// One live platform media object bound to a url.
pub trait MediaHandle {
    /// Begin playback. Must eventually report `StartSettled` for `ticket`,
    /// possibly after further calls have been made.
    fn start(&mut self, ticket: u64);
    /// Pause immediately. Pending starts may settle with `StartError::Aborted`.
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    /// Current hardware position in seconds.
    fn position(&self) -> f64;
    /// Give the handle a chance to notice natural end of media.
    fn poll(&mut self) {}
    /// Ramp the volume down before a shutdown.
    fn fade_out(&mut self, _over: Duration) {}
    /// Stop and free the resource. No events are expected afterwards.
    fn release(&mut self);
}

/// Factory for platform handles.
pub trait MediaBackend {
    fn open(
        &mut self,
        url: &str,
        kind: MediaKind,
        tap: EventTap,
    ) -> Result<Box<dyn MediaHandle>, BackendError>;
}
