use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use log::{info, warn};

use crate::config::Settings;
use crate::library::{Track, flatten, open_source};
use crate::logging;
use crate::media::{MediaBackend, RodioBackend};
use crate::playback::Visibility;

mod commands;
mod handle;
mod settings;
mod status;
mod thread;
mod types;

use commands::{Command, HELP, SleepRequest, parse_command};
pub use handle::PlayerHandle;
use status::{describe, describe_sleep_presets, describe_track};
pub use types::PlayerCmd;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, warning) = settings::load_settings();
    logging::init(&settings.logging);
    if let Some(msg) = warning {
        warn!("{msg}");
    }

    let mut args = env::args().skip(1).peekable();
    if args.peek().is_some_and(|a| a == "--print-config") {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let source = args.next().unwrap_or_else(|| {
        env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| ".".to_string())
    });

    let groups = open_source(Path::new(&source), &settings.library).list_practices()?;
    let tracks = flatten(&groups);
    info!(
        "{} practices in {} categories from {}",
        tracks.len(),
        groups.len(),
        source
    );

    let player = PlayerHandle::spawn(
        || RodioBackend::open_default().map(|b| Box::new(b) as Box<dyn MediaBackend>),
        &settings,
    )?;

    let stdin = io::stdin();
    let result = command_loop(stdin.lock(), io::stdout(), &player, &tracks, &settings);

    player.shutdown(Duration::from_millis(settings.player.quit_fade_out_ms));
    result
}

/// Read commands until `quit` or end of input.
fn command_loop<R: BufRead, W: Write>(
    input: R,
    mut out: W,
    player: &PlayerHandle,
    tracks: &[Track],
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    writeln!(out, "{} practices loaded; type `help` for commands", tracks.len())?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        for notice in player.drain_notices() {
            writeln!(out, "! {notice}")?;
        }

        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => {
                write!(out, "> ")?;
                out.flush()?;
                continue;
            }
            Err(err) => {
                writeln!(out, "{err}")?;
                write!(out, "> ")?;
                out.flush()?;
                continue;
            }
        };

        let request = match cmd {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{HELP}")?;
                writeln!(out, "{}", describe_sleep_presets(&settings.sleep_timer))?;
                None
            }
            Command::List => {
                for (i, track) in tracks.iter().enumerate() {
                    writeln!(out, "{}", describe_track(i + 1, track))?;
                }
                None
            }
            Command::Status => {
                writeln!(out, "{}", describe(&player.snapshot()))?;
                None
            }
            Command::Play(n) => match n.checked_sub(1).and_then(|i| tracks.get(i)) {
                Some(track) => Some(PlayerCmd::LoadAndPlay(track.clone())),
                None => {
                    writeln!(out, "no practice #{n}")?;
                    None
                }
            },
            Command::Toggle => Some(PlayerCmd::TogglePlayPause),
            Command::Seek(s) => Some(PlayerCmd::Seek(s)),
            Command::Drag(s) => Some(PlayerCmd::BeginScrub(s)),
            Command::DragMove(s) => Some(PlayerCmd::UpdateScrub(s)),
            Command::Drop(s) => Some(PlayerCmd::EndScrub(s)),
            Command::Close => Some(PlayerCmd::Close),
            Command::Open => Some(PlayerCmd::SetVisibility(Visibility::FullScreen)),
            Command::Mini => Some(PlayerCmd::SetVisibility(Visibility::Mini)),
            Command::Stop => Some(PlayerCmd::StopAndClose),
            Command::Sleep(req) => {
                let minutes = match req {
                    SleepRequest::Minutes(m) => Some(m),
                    SleepRequest::Default => Some(settings.sleep_timer.default_minutes),
                    SleepRequest::Off => None,
                };
                Some(PlayerCmd::ArmSleepTimer(minutes))
            }
        };

        if let Some(request) = request {
            if player.send(request).is_err() {
                warn!("player thread is gone");
                break;
            }
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}
