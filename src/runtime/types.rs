//! Messages and shared handles between the front-end and the player thread.

use std::sync::{Arc, Mutex};

use crate::library::Track;
use crate::playback::{SessionSnapshot, Visibility};

#[derive(Debug)]
pub enum PlayerCmd {
    /// Load the track and start playing it in the configured chrome.
    LoadAndPlay(Track),
    TogglePlayPause,
    /// Jump to an absolute position in seconds.
    Seek(f64),
    /// Drag gesture: press, move, release (all in seconds).
    BeginScrub(f64),
    UpdateScrub(f64),
    EndScrub(f64),
    /// Send the player to the background without stopping.
    Close,
    SetVisibility(Visibility),
    /// Full teardown.
    StopAndClose,
    /// Arm the sleep timer in minutes; `None` disarms.
    ArmSleepTimer(Option<f64>),
    /// Quit the player thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Latest session state, republished after every command and tick.
pub type SnapshotHandle = Arc<Mutex<SessionSnapshot>>;
