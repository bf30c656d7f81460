use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::Settings;
use crate::error::{BackendError, PlaybackError};
use crate::media::MediaBackend;
use crate::playback::SessionSnapshot;

use super::thread::{PlayerChannels, spawn_player_thread};
use super::types::{PlayerCmd, SnapshotHandle};

/// Front-end side of the player thread.
pub struct PlayerHandle {
    tx: Sender<PlayerCmd>,
    snapshot: SnapshotHandle,
    notices: Receiver<PlaybackError>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl PlayerHandle {
    /// Start the player thread and wait until its backend is open.
    pub fn spawn<F>(open_backend: F, settings: &Settings) -> Result<Self, BackendError>
    where
        F: FnOnce() -> Result<Box<dyn MediaBackend>, BackendError> + Send + 'static,
    {
        let (tx, commands) = mpsc::channel::<PlayerCmd>();
        let (notice_tx, notices) = mpsc::channel::<PlaybackError>();
        let (ready, ready_rx) = mpsc::channel();
        let snapshot: SnapshotHandle = Arc::new(Mutex::new(SessionSnapshot::default()));

        let join = spawn_player_thread(
            open_backend,
            PlayerChannels {
                commands,
                snapshot: snapshot.clone(),
                notices: notice_tx,
                ready,
            },
            settings.player.clone(),
            settings.chrome.clone(),
        );

        let started = ready_rx
            .recv()
            .unwrap_or_else(|_| Err(BackendError::Output("player thread exited".into())));
        if let Err(err) = started {
            let _ = join.join();
            return Err(err);
        }

        Ok(Self {
            tx,
            snapshot,
            notices,
            join: Mutex::new(Some(join)),
        })
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), mpsc::SendError<PlayerCmd>> {
        self.tx.send(cmd)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Notices published since the last call.
    pub fn drain_notices(&self) -> Vec<PlaybackError> {
        self.notices.try_iter().collect()
    }

    /// Ask the thread to fade out and quit, then wait for it.
    pub fn shutdown(&self, fade_out: Duration) {
        let _ = self.send(PlayerCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
