use std::time::{Duration, Instant};

use super::*;
use crate::config::{ChromeMode, ChromeSettings};
use crate::error::{PlaybackError, StartError};
use crate::library::Track;
use crate::media::scripted::Script;

fn track(url: &str) -> Track {
    Track::new(url, url.trim_start_matches('/'), Some(url))
}

fn setup() -> (Script, Player) {
    let script = Script::new().with_duration(120.0);
    let player = Player::new(script.backend(), &ChromeSettings::default());
    (script, player)
}

/// Load `url` and let the hardware confirm the start.
fn start_playing(script: &Script, player: &mut Player, url: &str) {
    player.load_and_play(track(url)).unwrap();
    script.settle_all(Ok(()));
    player.pump();
    assert!(player.session().is_playing());
}

/// Let the hardware confirm every start, including reissued ones.
fn settle_everything(script: &Script, player: &mut Player) {
    for _ in 0..4 {
        player.pump();
        script.settle_all(Ok(()));
    }
    player.pump();
}

#[test]
fn switching_tracks_never_overlaps_handles() {
    let (script, mut player) = setup();
    player.load_and_play(track("/a.mp3")).unwrap();
    player.load_and_play(track("/b.mp3")).unwrap();

    assert_eq!(script.max_live(), 1);
    assert_eq!(script.live(), 1);
    assert_eq!(script.opened(), vec!["/a.mp3", "/b.mp3"]);
    assert_eq!(script.current_url().as_deref(), Some("/b.mp3"));

    settle_everything(&script, &mut player);
    let session = player.session();
    assert!(session.is_playing());
    assert_eq!(session.track().and_then(|t| t.url.as_deref()), Some("/b.mp3"));
    assert!(script.is_playing());
}

#[test]
fn events_from_replaced_handle_are_ignored() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");
    start_playing(&script, &mut player, "/b.mp3");

    script.finish_handle(0);
    player.pump();
    assert!(player.session().is_playing());
    assert!(player.take_notices().is_empty());
}

#[test]
fn cosmetic_reload_keeps_handle_and_position() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");
    script.advance(30.0);
    player.tick(Instant::now());
    assert_eq!(player.session().current_time(), 30.0);

    let mut renamed = track("/a.mp3");
    renamed.name = "Morning breath".into();
    renamed.media_id = "m-42".into();
    player.load_and_play(renamed).unwrap();

    assert_eq!(script.opened().len(), 1);
    let session = player.session();
    assert_eq!(session.current_time(), 30.0);
    assert!(session.is_playing());
    assert_eq!(session.track().map(|t| t.name.as_str()), Some("Morning breath"));
}

#[test]
fn rapid_toggles_follow_the_last_request() {
    for toggles in 0..8 {
        let (script, mut player) = setup();
        start_playing(&script, &mut player, "/a.mp3");

        for _ in 0..toggles {
            player.toggle_play_pause();
        }
        settle_everything(&script, &mut player);

        let expected = toggles % 2 == 0;
        assert_eq!(player.session().is_playing(), expected, "{toggles} toggles");
        assert_eq!(script.is_playing(), expected, "hardware after {toggles} toggles");
        assert!(player.take_notices().is_empty());
    }
}

#[test]
fn toggles_before_the_first_start_settles() {
    let (script, mut player) = setup();
    player.load_and_play(track("/a.mp3")).unwrap();
    player.toggle_play_pause();
    player.toggle_play_pause();
    player.toggle_play_pause();
    settle_everything(&script, &mut player);

    assert_eq!(player.session().state(), PlaybackState::Paused);
    assert!(!script.is_playing());
    assert!(player.take_notices().is_empty());
}

#[test]
fn late_success_after_pause_is_paused_again() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");
    player.toggle_play_pause();
    player.toggle_play_pause();

    // Hardware starts before the player learns about it, then the user pauses.
    script.settle_all(Ok(()));
    player.toggle_play_pause();
    player.pump();

    assert!(!player.session().is_playing());
    assert!(!script.is_playing());
}

#[test]
fn seek_is_clamped_to_the_track() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");
    assert_eq!(player.session().duration(), 120.0);

    player.seek(-5.0);
    assert_eq!(player.snapshot(Instant::now()).current_time, 0.0);

    player.seek(500.0);
    assert_eq!(player.snapshot(Instant::now()).current_time, 120.0);
    assert_eq!(script.position(), 120.0);
}

#[test]
fn seek_before_metadata_passes_through_then_clamps() {
    let (_script, mut player) = setup();
    player.load_and_play(track("/a.mp3")).unwrap();
    player.seek(500.0);
    assert_eq!(player.session().current_time(), 500.0);

    player.pump();
    assert_eq!(player.session().current_time(), 120.0);
}

#[test]
fn drag_is_not_overridden_by_live_position() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");

    player.begin_scrub(40.0);
    script.set_position(10.0);
    player.tick(Instant::now());
    let snap = player.snapshot(Instant::now());
    assert!(snap.scrubbing);
    assert_eq!(snap.current_time, 40.0);

    player.update_scrub(55.0);
    script.advance(3.0);
    player.tick(Instant::now());
    assert_eq!(player.snapshot(Instant::now()).current_time, 55.0);

    player.end_scrub(60.0);
    let snap = player.snapshot(Instant::now());
    assert!(!snap.scrubbing);
    assert_eq!(snap.current_time, 60.0);
    assert_eq!(script.position(), 60.0);

    // Sampling resumes right after release.
    script.advance(2.0);
    player.tick(Instant::now());
    assert_eq!(player.session().current_time(), 62.0);
}

#[test]
fn sleep_timer_pauses_and_keeps_the_track() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");
    let t0 = Instant::now();
    player.arm_sleep_timer(Some(1.0), t0);

    player.tick(t0 + Duration::from_secs(30));
    assert!(player.session().is_playing());
    assert_eq!(
        player.sleep_timer_remaining(t0 + Duration::from_secs(30)),
        Some(Duration::from_secs(30))
    );

    let late = t0 + Duration::from_secs(61);
    player.tick(late);
    let session = player.session();
    assert!(!session.is_playing());
    assert_eq!(session.state(), PlaybackState::Paused);
    assert!(session.track().is_some());
    assert_eq!(player.sleep_timer_remaining(late), None);
    assert!(!script.is_playing());
}

#[test]
fn manual_pause_keeps_the_countdown_running() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");
    let t0 = Instant::now();
    player.arm_sleep_timer(Some(1.0), t0);
    player.toggle_play_pause();

    let late = t0 + Duration::from_secs(90);
    player.tick(late);
    assert_eq!(player.sleep_timer_remaining(late), Some(Duration::ZERO));

    // Resuming past the deadline stops on the next tick.
    player.toggle_play_pause();
    settle_everything(&script, &mut player);
    player.tick(late);
    assert!(!player.session().is_playing());
    assert_eq!(player.sleep_timer_remaining(late), None);
}

#[test]
fn sleep_timer_and_track_changes() {
    let (script, mut player) = setup();
    let t0 = Instant::now();

    // Armed before anything is loaded: carried into the first load.
    player.arm_sleep_timer(Some(10.0), t0);
    start_playing(&script, &mut player, "/a.mp3");
    assert!(player.sleep_timer_remaining(t0).is_some());

    player.load_and_play(track("/a.mp3")).unwrap();
    assert!(player.sleep_timer_remaining(t0).is_some());

    player.load_and_play(track("/b.mp3")).unwrap();
    assert_eq!(player.sleep_timer_remaining(t0), None);
}

#[test]
fn stop_and_close_resets_everything() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");
    let now = Instant::now();
    player.seek(30.0);
    player.arm_sleep_timer(Some(5.0), now);
    let seeks_before = script.seeks();

    player.stop_and_close();
    // Released without being rewound first.
    assert_eq!(script.seeks(), seeks_before);

    let snap = player.snapshot(now);
    assert_eq!(snap.track, None);
    assert_eq!(snap.duration, 0.0);
    assert_eq!(snap.current_time, 0.0);
    assert!(!snap.is_playing);
    assert_eq!(snap.visibility, Visibility::Hidden);
    assert_eq!(player.sleep_timer_remaining(now), None);
    assert_eq!(script.live(), 0);

    // Leftovers from the released handle change nothing.
    script.finish_handle(0);
    player.pump();
    assert_eq!(player.snapshot(now), snap);
}

#[test]
fn close_sends_playback_to_the_background() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");
    assert_eq!(player.session().visibility(), Visibility::FullScreen);

    player.close();
    assert_eq!(player.session().visibility(), Visibility::Mini);
    assert!(player.session().is_playing());
    assert_eq!(script.live(), 1);

    script.advance(5.0);
    player.tick(Instant::now());
    assert_eq!(player.session().current_time(), 5.0);
}

#[test]
fn natural_end_rewinds_and_allows_replay() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");
    script.advance(20.0);
    player.tick(Instant::now());

    script.finish();
    player.pump();
    let session = player.session();
    assert_eq!(session.state(), PlaybackState::Stopped);
    assert_eq!(session.current_time(), 0.0);
    assert!(session.track().is_some());
    assert_eq!(session.visibility(), Visibility::FullScreen);
    assert_eq!(script.position(), 0.0);

    player.close();
    assert_eq!(player.session().visibility(), Visibility::Hidden);

    player.toggle_play_pause();
    settle_everything(&script, &mut player);
    assert!(player.session().is_playing());
    assert!(script.is_playing());
    assert_eq!(player.session().visibility(), Visibility::Mini);
}

#[test]
fn unplayable_track_is_rejected_without_side_effects() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");

    let err = player
        .load_and_play(Track::new("x", "No file", Some("  ")))
        .unwrap_err();
    assert_eq!(
        err,
        PlaybackError::TrackUnplayable {
            name: "No file".into()
        }
    );
    assert_eq!(
        player.session().track().and_then(|t| t.url.as_deref()),
        Some("/a.mp3")
    );
    assert!(player.session().is_playing());
    assert_eq!(script.opened().len(), 1);
}

#[test]
fn failed_open_keeps_the_requested_track_stopped() {
    let (script, mut player) = setup();
    script.fail_open("/broken.mp3");

    player.load_and_play(track("/broken.mp3")).unwrap();
    let session = player.session();
    assert_eq!(session.state(), PlaybackState::Stopped);
    assert_eq!(
        session.track().and_then(|t| t.url.as_deref()),
        Some("/broken.mp3")
    );
    assert!(matches!(
        player.take_notices().as_slice(),
        [PlaybackError::StartFailed { .. }]
    ));

    // Retrying tries to open again and reports again.
    player.toggle_play_pause();
    assert_eq!(player.session().state(), PlaybackState::Stopped);
    assert_eq!(player.take_notices().len(), 1);
}

#[test]
fn start_failure_reverts_intent() {
    let (script, mut player) = setup();
    player.load_and_play(track("/a.mp3")).unwrap();
    script.settle_all(Err(StartError::Unavailable("404".into())));
    player.pump();

    assert_eq!(player.session().state(), PlaybackState::Stopped);
    assert!(player.session().track().is_some());
    let notices = player.take_notices();
    assert!(matches!(
        notices.as_slice(),
        [PlaybackError::StartFailed { reason, .. }] if reason.contains("404")
    ));

    // After a successful start, a failed resume leaves the transport paused.
    player.toggle_play_pause();
    settle_everything(&script, &mut player);
    player.toggle_play_pause();
    player.toggle_play_pause();
    script.settle_all(Err(StartError::Unsupported("codec".into())));
    player.pump();
    assert_eq!(player.session().state(), PlaybackState::Paused);
}

#[test]
fn pausing_a_pending_start_is_silent() {
    let (_script, mut player) = setup();
    player.load_and_play(track("/a.mp3")).unwrap();
    player.toggle_play_pause();
    player.pump();

    assert_eq!(player.session().state(), PlaybackState::Paused);
    assert!(player.take_notices().is_empty());
}

#[test]
fn runtime_error_pauses_and_reports() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");
    script.advance(12.0);
    player.tick(Instant::now());

    script.fail("decode error");
    player.pump();
    let session = player.session();
    assert_eq!(session.state(), PlaybackState::Paused);
    assert_eq!(session.current_time(), 12.0);
    assert!(matches!(
        player.take_notices().as_slice(),
        [PlaybackError::Runtime { .. }]
    ));
}

#[test]
fn visibility_requests_respect_the_transport() {
    let (script, mut player) = setup();
    player.set_visibility(Visibility::FullScreen);
    assert_eq!(player.session().visibility(), Visibility::Hidden);

    start_playing(&script, &mut player, "/a.mp3");
    player.set_visibility(Visibility::Mini);
    assert_eq!(player.session().visibility(), Visibility::Mini);
    player.set_visibility(Visibility::FullScreen);
    assert_eq!(player.session().visibility(), Visibility::FullScreen);
    player.set_visibility(Visibility::Hidden);
    assert_eq!(player.session().visibility(), Visibility::Mini);
    assert!(player.session().is_playing());
}

#[test]
fn configured_chrome_applies_to_loads() {
    let script = Script::new();
    let chrome = ChromeSettings {
        open_in: ChromeMode::Mini,
    };
    let mut player = Player::new(script.backend(), &chrome);
    player.load_and_play(track("/a.mp3")).unwrap();
    assert_eq!(player.session().visibility(), Visibility::Mini);

    player
        .load_and_play_in(track("/b.mp3"), Visibility::FullScreen)
        .unwrap();
    assert_eq!(player.session().visibility(), Visibility::FullScreen);
}

#[test]
fn snapshot_reports_progress() {
    let (script, mut player) = setup();
    start_playing(&script, &mut player, "/a.mp3");
    player.seek(30.0);

    let snap = player.snapshot(Instant::now());
    assert_eq!(snap.state, PlaybackState::Playing);
    assert!(snap.is_playing);
    assert_eq!(snap.progress, 0.25);
    assert_eq!(snap.sleep_remaining, None);
}
