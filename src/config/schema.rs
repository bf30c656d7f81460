use serde::{Deserialize, Serialize};

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/soul_player/config.toml` or `~/.config/soul_player/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SOUL_PLAYER__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerSettings,
    pub chrome: ChromeSettings,
    pub sleep_timer: SleepTimerSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Interval between position samples, end-of-media polls and sleep-timer
    /// checks (milliseconds). Must be between 1 and 1000.
    pub tick_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ChromeSettings {
    /// Which player chrome a freshly loaded track opens in.
    pub open_in: ChromeMode,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChromeMode {
    #[default]
    #[serde(alias = "fullscreen", alias = "full_screen", alias = "full")]
    FullScreen,
    #[serde(alias = "mini-player", alias = "mini_player")]
    Mini,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SleepTimerSettings {
    /// Durations offered by the front-end, in minutes.
    pub presets_minutes: Vec<f64>,
    /// Duration used by `sleep` without an argument, in minutes.
    pub default_minutes: f64,
}

impl Default for SleepTimerSettings {
    fn default() -> Self {
        Self {
            presets_minutes: vec![5.0, 10.0, 15.0, 30.0, 60.0],
            default_minutes: 15.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// File extensions to treat as video (case-insensitive, without dot).
    pub video_extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            video_extensions: vec!["mp4".into(), "webm".into(), "mov".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub format: LogFormat,
    pub mode: LogMode,
    /// Directory for `mode = "file"`; the working directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    pub file_name: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            mode: LogMode::Stderr,
            dir: None,
            file_name: "soul_player.log".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogMode {
    #[default]
    Stderr,
    File,
}
