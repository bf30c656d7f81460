//! In-memory backend driven by tests.
//!
//! Start requests stay pending until the test settles them, mirroring
//! hardware whose start completes later. Pausing aborts pending starts the
//! way a browser media element rejects `play()` when `pause()` follows.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{BackendError, StartError};
use crate::library::MediaKind;

use super::backend::{EventTap, MediaBackend, MediaHandle};

struct HandleState {
    url: String,
    tap: EventTap,
    playing: bool,
    position: f64,
    pending: Vec<u64>,
    released: bool,
}

#[derive(Default)]
struct ScriptState {
    duration: Option<f64>,
    fail_open: Vec<String>,
    live: usize,
    max_live: usize,
    seeks: Vec<f64>,
    handles: Vec<HandleState>,
}

impl ScriptState {
    fn current(&mut self) -> Option<&mut HandleState> {
        self.handles.iter_mut().rev().find(|h| !h.released)
    }
}

/// Shared view of the scripted hardware.
#[derive(Clone, Default)]
pub struct Script(Rc<RefCell<ScriptState>>);

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every opened handle reports this duration right away.
    pub fn with_duration(self, seconds: f64) -> Self {
        self.0.borrow_mut().duration = Some(seconds);
        self
    }

    pub fn fail_open(&self, url: &str) {
        self.0.borrow_mut().fail_open.push(url.to_string());
    }

    pub fn backend(&self) -> Box<dyn MediaBackend> {
        Box::new(ScriptedBackend {
            script: self.clone(),
        })
    }

    pub fn opened(&self) -> Vec<String> {
        self.0.borrow().handles.iter().map(|h| h.url.clone()).collect()
    }

    pub fn live(&self) -> usize {
        self.0.borrow().live
    }

    pub fn max_live(&self) -> usize {
        self.0.borrow().max_live
    }

    /// Every seek issued to any handle, in order.
    pub fn seeks(&self) -> Vec<f64> {
        self.0.borrow().seeks.clone()
    }

    pub fn current_url(&self) -> Option<String> {
        self.0.borrow_mut().current().map(|h| h.url.clone())
    }

    pub fn pending_starts(&self) -> Vec<u64> {
        self.0
            .borrow_mut()
            .current()
            .map(|h| h.pending.clone())
            .unwrap_or_default()
    }

    /// Settle one pending start on the current handle.
    pub fn settle(&self, ticket: u64, result: Result<(), StartError>) {
        let mut state = self.0.borrow_mut();
        let Some(h) = state.current() else {
            return;
        };
        h.pending.retain(|t| *t != ticket);
        if result.is_ok() {
            h.playing = true;
        }
        h.tap.start_settled(ticket, result);
    }

    /// Settle every pending start on the current handle, oldest first.
    pub fn settle_all(&self, result: Result<(), StartError>) {
        for ticket in self.pending_starts() {
            self.settle(ticket, result.clone());
        }
    }

    pub fn is_playing(&self) -> bool {
        self.0.borrow_mut().current().is_some_and(|h| h.playing)
    }

    pub fn position(&self) -> f64 {
        self.0.borrow_mut().current().map_or(0.0, |h| h.position)
    }

    pub fn set_position(&self, seconds: f64) {
        if let Some(h) = self.0.borrow_mut().current() {
            h.position = seconds;
        }
    }

    /// Advance the current handle's clock if it is playing.
    pub fn advance(&self, seconds: f64) {
        if let Some(h) = self.0.borrow_mut().current() {
            if h.playing {
                h.position += seconds;
            }
        }
    }

    /// Reach natural end of media on the current handle.
    pub fn finish(&self) {
        if let Some(h) = self.0.borrow_mut().current() {
            h.playing = false;
            h.tap.ended();
        }
    }

    /// Raise a hardware error on the current handle.
    pub fn fail(&self, reason: &str) {
        if let Some(h) = self.0.borrow_mut().current() {
            h.playing = false;
            h.tap.failed(reason);
        }
    }

    /// Emit `Ended` from the handle opened `index`-th, released or not.
    pub fn finish_handle(&self, index: usize) {
        if let Some(h) = self.0.borrow().handles.get(index) {
            h.tap.ended();
        }
    }
}

struct ScriptedBackend {
    script: Script,
}

impl MediaBackend for ScriptedBackend {
    fn open(
        &mut self,
        url: &str,
        _kind: MediaKind,
        tap: EventTap,
    ) -> Result<Box<dyn MediaHandle>, BackendError> {
        let mut state = self.script.0.borrow_mut();
        if state.fail_open.iter().any(|u| u == url) {
            return Err(BackendError::Decode {
                path: url.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        if let Some(d) = state.duration {
            tap.metadata_ready(d);
        }
        state.handles.push(HandleState {
            url: url.to_string(),
            tap,
            playing: false,
            position: 0.0,
            pending: Vec::new(),
            released: false,
        });
        state.live += 1;
        state.max_live = state.max_live.max(state.live);
        let index = state.handles.len() - 1;
        Ok(Box::new(ScriptedHandle {
            script: self.script.clone(),
            index,
        }))
    }
}

struct ScriptedHandle {
    script: Script,
    index: usize,
}

impl ScriptedHandle {
    fn with<R>(&self, f: impl FnOnce(&mut HandleState) -> R) -> R {
        f(&mut self.script.0.borrow_mut().handles[self.index])
    }
}

impl MediaHandle for ScriptedHandle {
    fn start(&mut self, ticket: u64) {
        self.with(|h| h.pending.push(ticket));
    }

    fn pause(&mut self) {
        self.with(|h| {
            h.playing = false;
            for ticket in h.pending.drain(..) {
                h.tap.start_settled(ticket, Err(StartError::Aborted));
            }
        });
    }

    fn seek(&mut self, seconds: f64) {
        let mut state = self.script.0.borrow_mut();
        state.seeks.push(seconds);
        state.handles[self.index].position = seconds;
    }

    fn position(&self) -> f64 {
        self.with(|h| h.position)
    }

    fn release(&mut self) {
        let mut state = self.script.0.borrow_mut();
        let h = &mut state.handles[self.index];
        if !h.released {
            h.released = true;
            h.playing = false;
            state.live -= 1;
        }
    }
}
