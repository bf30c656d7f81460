use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, error};

use crate::config::{ChromeSettings, PlayerSettings};
use crate::error::{BackendError, PlaybackError};
use crate::media::MediaBackend;
use crate::playback::Player;

use super::types::{PlayerCmd, SnapshotHandle};

/// Channels the player thread talks through.
pub(super) struct PlayerChannels {
    pub commands: Receiver<PlayerCmd>,
    pub snapshot: SnapshotHandle,
    pub notices: Sender<PlaybackError>,
    /// Receives the outcome of opening the backend, exactly once.
    pub ready: Sender<Result<(), BackendError>>,
}

/// Spawn the thread that owns the [`Player`]. The backend is opened on that
/// thread because output streams are not `Send`.
pub(super) fn spawn_player_thread<F>(
    open_backend: F,
    channels: PlayerChannels,
    player_settings: PlayerSettings,
    chrome: ChromeSettings,
) -> JoinHandle<()>
where
    F: FnOnce() -> Result<Box<dyn MediaBackend>, BackendError> + Send + 'static,
{
    thread::spawn(move || {
        let PlayerChannels {
            commands,
            snapshot,
            notices,
            ready,
        } = channels;

        let backend = match open_backend() {
            Ok(b) => b,
            Err(err) => {
                error!("cannot open media backend: {err}");
                let _ = ready.send(Err(err));
                return;
            }
        };
        let _ = ready.send(Ok(()));

        let mut player = Player::new(backend, &chrome);
        let tick = Duration::from_millis(player_settings.tick_ms.max(1));
        let mut last_tick = Instant::now();

        loop {
            match commands.recv_timeout(tick) {
                Ok(PlayerCmd::Quit { fade_out_ms }) => {
                    debug!("player thread quitting");
                    player.shutdown(Duration::from_millis(fade_out_ms));
                    publish(&mut player, &snapshot, &notices, Instant::now());
                    break;
                }
                Ok(cmd) => {
                    if let Err(err) = apply_command(&mut player, cmd, Instant::now()) {
                        let _ = notices.send(err);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    player.shutdown(Duration::ZERO);
                    break;
                }
            }

            // Commands arriving faster than the tick must not starve it.
            let now = Instant::now();
            if now.duration_since(last_tick) >= tick {
                player.tick(now);
                last_tick = now;
            }
            publish(&mut player, &snapshot, &notices, now);
        }
    })
}

/// Apply one front-end command and the media events it caused.
pub(super) fn apply_command(
    player: &mut Player,
    cmd: PlayerCmd,
    now: Instant,
) -> Result<(), PlaybackError> {
    match cmd {
        PlayerCmd::LoadAndPlay(track) => player.load_and_play(track)?,
        PlayerCmd::TogglePlayPause => player.toggle_play_pause(),
        PlayerCmd::Seek(secs) => player.seek(secs),
        PlayerCmd::BeginScrub(secs) => player.begin_scrub(secs),
        PlayerCmd::UpdateScrub(secs) => player.update_scrub(secs),
        PlayerCmd::EndScrub(secs) => player.end_scrub(secs),
        PlayerCmd::Close => player.close(),
        PlayerCmd::SetVisibility(v) => player.set_visibility(v),
        PlayerCmd::StopAndClose => player.stop_and_close(),
        PlayerCmd::ArmSleepTimer(minutes) => player.arm_sleep_timer(minutes, now),
        PlayerCmd::Quit { .. } => {}
    }
    player.pump();
    Ok(())
}

fn publish(
    player: &mut Player,
    snapshot: &SnapshotHandle,
    notices: &Sender<PlaybackError>,
    now: Instant,
) {
    if let Ok(mut snap) = snapshot.lock() {
        *snap = player.snapshot(now);
    }
    for notice in player.take_notices() {
        let _ = notices.send(notice);
    }
}
