use crate::config::SleepTimerSettings;
use crate::library::{Track, format_clock};
use crate::playback::{PlaybackState, SessionSnapshot, Visibility};

/// One-line summary of the session for the `status` command.
pub fn describe(snap: &SessionSnapshot) -> String {
    let Some(track) = snap.track.as_ref() else {
        return match snap.sleep_remaining {
            Some(left) => format!("nothing loaded (sleep in {})", format_clock(left.as_secs_f64())),
            None => "nothing loaded".to_string(),
        };
    };

    let mut line = format!(
        "{} {:?} {} / {}",
        snap.state.label(),
        track.name,
        format_clock(snap.current_time),
        format_clock(snap.duration),
    );
    if snap.scrubbing {
        line.push_str(" (dragging)");
    }
    if snap.visibility != Visibility::Hidden {
        line.push_str(&format!(" [{}]", snap.visibility.label()));
    }
    if let Some(left) = snap.sleep_remaining {
        line.push_str(&format!(" sleep in {}", format_clock(left.as_secs_f64())));
    }
    if snap.state == PlaybackState::Stopped && snap.current_time == 0.0 {
        line.push_str(" (toggle to replay)");
    }
    line
}

/// Sleep timer presets line shown under `help`.
pub fn describe_sleep_presets(settings: &SleepTimerSettings) -> String {
    let presets: Vec<String> = settings
        .presets_minutes
        .iter()
        .map(|m| m.to_string())
        .collect();
    format!(
        "sleep presets: {} min (default {})",
        presets.join(", "),
        settings.default_minutes
    )
}

/// Listing entry, numbered from 1.
pub fn describe_track(number: usize, track: &Track) -> String {
    let mut line = format!("{number:>3}. ");
    if let Some(category) = track.category.as_deref() {
        line.push_str(&format!("[{category}] "));
    }
    line.push_str(&track.name);
    if let Some(label) = track.duration_label.as_deref() {
        line.push_str(&format!(" ({label})"));
    }
    if !track.is_playable() {
        line.push_str(" - unavailable");
    }
    line
}
