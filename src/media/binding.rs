use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use log::{debug, trace, warn};

use crate::error::BackendError;
use crate::library::Track;

use super::backend::{EventTap, HandleId, MediaBackend, MediaEvent, MediaHandle};

/// Result of asking the binding to follow a track.
#[derive(Debug)]
pub enum BindOutcome {
    /// Same url (or nothing bound and nothing requested); handle kept.
    Unchanged,
    /// Old handle (if any) released and a new one opened.
    Rebound(HandleId),
    /// Old handle released, nothing requested.
    Released,
    /// Old handle (if any) released; opening the new one failed.
    Failed(BackendError),
}

struct Bound {
    id: HandleId,
    url: String,
    handle: Box<dyn MediaHandle>,
}

/// Owns the single live platform handle and filters its events.
pub struct MediaBinding {
    backend: Box<dyn MediaBackend>,
    current: Option<Bound>,
    next_id: u64,
    tx: Sender<MediaEvent>,
    rx: Receiver<MediaEvent>,
}

impl MediaBinding {
    pub fn new(backend: Box<dyn MediaBackend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            current: None,
            next_id: 0,
            tx,
            rx,
        }
    }

    pub fn current_id(&self) -> Option<HandleId> {
        self.current.as_ref().map(|b| b.id)
    }

    pub fn bound_url(&self) -> Option<&str> {
        self.current.as_ref().map(|b| b.url.as_str())
    }

    /// Make the live handle match `track`'s url.
    ///
    /// An unchanged url keeps the existing handle even when other track fields
    /// differ. Otherwise the old handle is detached and released before the
    /// new one is opened, so two handles never coexist.
    pub fn bind(&mut self, track: Option<&Track>) -> BindOutcome {
        let wanted = track.and_then(|t| t.playable_url().map(|url| (url, t.kind)));

        match (wanted, self.bound_url()) {
            (Some((url, _)), Some(bound)) if url == bound => return BindOutcome::Unchanged,
            (None, None) => return BindOutcome::Unchanged,
            _ => {}
        }

        let released = self.release_current();
        let Some((url, kind)) = wanted else {
            return if released {
                BindOutcome::Released
            } else {
                BindOutcome::Unchanged
            };
        };

        self.next_id += 1;
        let id = HandleId(self.next_id);
        let tap = EventTap::new(id, self.tx.clone());
        match self.backend.open(url, kind, tap) {
            Ok(handle) => {
                debug!("bound handle {:?} to {}", id, url);
                self.current = Some(Bound {
                    id,
                    url: url.to_string(),
                    handle,
                });
                BindOutcome::Rebound(id)
            }
            Err(err) => {
                warn!("failed to open {}: {}", url, err);
                BindOutcome::Failed(err)
            }
        }
    }

    fn release_current(&mut self) -> bool {
        // Detach first: anything the old handle emits from here on is stale.
        let Some(mut old) = self.current.take() else {
            return false;
        };
        old.handle.pause();
        old.handle.release();
        debug!("released handle {:?} ({})", old.id, old.url);
        true
    }

    /// Issue a hardware start. Returns false when nothing is bound.
    pub fn start(&mut self, ticket: u64) -> bool {
        match self.current.as_mut() {
            Some(b) => {
                b.handle.start(ticket);
                true
            }
            None => false,
        }
    }

    pub fn pause(&mut self) {
        if let Some(b) = self.current.as_mut() {
            b.handle.pause();
        }
    }

    pub fn seek(&mut self, seconds: f64) {
        if let Some(b) = self.current.as_mut() {
            b.handle.seek(seconds);
        }
    }

    pub fn position(&self) -> Option<f64> {
        self.current
            .as_ref()
            .map(|b| b.handle.position())
            .filter(|p| p.is_finite())
    }

    pub fn poll(&mut self) {
        if let Some(b) = self.current.as_mut() {
            b.handle.poll();
        }
    }

    pub fn fade_out(&mut self, over: Duration) {
        if let Some(b) = self.current.as_mut() {
            b.handle.fade_out(over);
        }
    }

    /// Pending events from the current handle, in arrival order.
    pub fn drain_events(&mut self) -> Vec<MediaEvent> {
        let current = self.current_id();
        self.rx
            .try_iter()
            .filter(|event| {
                let live = Some(event.handle) == current;
                if !live {
                    trace!("dropping stale event {:?}", event);
                }
                live
            })
            .collect()
    }
}
