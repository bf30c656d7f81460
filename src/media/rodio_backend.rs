//! `rodio` implementation of the media seam.
//!
//! One output stream per player thread; one `Sink` per handle. Starting and
//! pausing a sink are synchronous, so start requests settle immediately.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use lofty::prelude::AudioFile;
use log::{debug, warn};
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::error::{BackendError, StartError};
use crate::library::MediaKind;

use super::backend::{EventTap, MediaBackend, MediaHandle};

pub struct RodioBackend {
    stream: OutputStream,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open_default() -> Result<Self, BackendError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| BackendError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped; noisy next to the prompt.
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl MediaBackend for RodioBackend {
    fn open(
        &mut self,
        url: &str,
        kind: MediaKind,
        tap: EventTap,
    ) -> Result<Box<dyn MediaHandle>, BackendError> {
        let path = resolve_path(url)?;
        if kind == MediaKind::Video {
            debug!("{}: video track, playing its audio only", path.display());
        }
        let mixer = self.stream.mixer().clone();
        let (sink, decoded) = create_sink_at(&mixer, &path, Duration::ZERO)?;
        if let Some(total) = known_duration(decoded, &path) {
            tap.metadata_ready(total.as_secs_f64());
        }
        Ok(Box::new(RodioHandle {
            mixer,
            path,
            sink,
            base: Duration::ZERO,
            tap,
            end_reported: false,
            released: false,
        }))
    }
}

/// Map a track url to a local path. Only plain paths and `file://` urls resolve.
pub(crate) fn resolve_path(url: &str) -> Result<PathBuf, BackendError> {
    let url = url.trim();
    if let Some(rest) = url.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if url.contains("://") {
        return Err(BackendError::UnsupportedScheme(url.to_string()));
    }
    Ok(PathBuf::from(url))
}

/// Length reported by the decoder, else the one in the file's properties.
/// Headerless CBR streams only have the latter.
fn known_duration(decoded: Option<Duration>, path: &Path) -> Option<Duration> {
    decoded.filter(|d| !d.is_zero()).or_else(|| {
        lofty::read_from_path(path)
            .ok()
            .map(|tagged| tagged.properties().duration())
            .filter(|d| !d.is_zero())
    })
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
fn create_sink_at(
    mixer: &Mixer,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), BackendError> {
    let file = File::open(path).map_err(|source| BackendError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| BackendError::Decode {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(mixer);
    // `skip_duration` is the fallback seeking primitive; Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}

struct RodioHandle {
    mixer: Mixer,
    path: PathBuf,
    sink: Sink,
    /// Offset the current sink was built at; `get_pos` counts from there.
    base: Duration,
    tap: EventTap,
    end_reported: bool,
    released: bool,
}

impl RodioHandle {
    /// Replace the sink with a fresh one skipped to `at`, keeping play/pause state.
    fn rebuild_at(&mut self, at: Duration) -> Result<(), BackendError> {
        let was_paused = self.sink.is_paused();
        self.sink.stop();
        let (sink, _) = create_sink_at(&self.mixer, &self.path, at).inspect_err(|err| {
            warn!("rebuilding sink for {} failed: {}", self.path.display(), err);
        })?;
        if !was_paused {
            sink.play();
        }
        self.sink = sink;
        self.base = at;
        self.end_reported = false;
        Ok(())
    }
}

impl MediaHandle for RodioHandle {
    fn start(&mut self, ticket: u64) {
        if self.released {
            self.tap.start_settled(ticket, Err(StartError::Aborted));
            return;
        }
        if self.sink.empty() {
            // Finished earlier; start over from the top.
            self.sink.pause();
            if let Err(err) = self.rebuild_at(Duration::ZERO) {
                self.tap.start_settled(ticket, Err(err.into()));
                return;
            }
        }
        self.sink.play();
        self.end_reported = false;
        self.tap.start_settled(ticket, Ok(()));
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek(&mut self, seconds: f64) {
        let target = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::ZERO);
        if self.base.is_zero() && !self.sink.empty() {
            match self.sink.try_seek(target) {
                Ok(()) => return,
                Err(err) => debug!("try_seek failed ({}), rebuilding sink", err),
            }
        }
        if let Err(err) = self.rebuild_at(target) {
            self.tap.failed(err.to_string());
        }
    }

    fn position(&self) -> f64 {
        (self.base + self.sink.get_pos()).as_secs_f64()
    }

    fn poll(&mut self) {
        if !self.released && !self.end_reported && !self.sink.is_paused() && self.sink.empty() {
            self.end_reported = true;
            self.tap.ended();
        }
    }

    fn fade_out(&mut self, over: Duration) {
        if over.is_zero() || self.sink.is_paused() {
            self.sink.set_volume(0.0);
            return;
        }
        let steps: u32 = 20;
        let step = (over / steps).max(Duration::from_millis(1));
        for i in 1..=steps {
            self.sink.set_volume(1.0 - i as f32 / steps as f32);
            thread::sleep(step);
        }
        self.sink.set_volume(0.0);
    }

    fn release(&mut self) {
        self.sink.stop();
        self.released = true;
    }
}
