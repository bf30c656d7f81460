use crate::config::ChromeMode;

use super::session::PlaybackState;

/// Which player chrome is on screen. Independent of playing intent, except
/// that `Hidden` is only reachable while stopped or with nothing loaded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Hidden,
    FullScreen,
    Mini,
}

impl Visibility {
    /// Chrome left after dismissing the full-screen player.
    pub fn demoted(state: PlaybackState, has_track: bool) -> Self {
        if has_track && state != PlaybackState::Stopped {
            Self::Mini
        } else {
            Self::Hidden
        }
    }

    /// Fit a requested mode to the transport: nothing loaded means `Hidden`,
    /// and a loaded, running transport cannot be hidden outright.
    pub fn constrained(self, state: PlaybackState, has_track: bool) -> Self {
        match self {
            _ if !has_track => Self::Hidden,
            Self::Hidden => Self::demoted(state, has_track),
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::FullScreen => "full-screen",
            Self::Mini => "mini",
        }
    }
}

impl From<ChromeMode> for Visibility {
    fn from(mode: ChromeMode) -> Self {
        match mode {
            ChromeMode::FullScreen => Self::FullScreen,
            ChromeMode::Mini => Self::Mini,
        }
    }
}
