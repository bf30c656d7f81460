use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, lets environment variables
/// (prefix `SOUL_PLAYER__`) override it and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SOUL_PLAYER")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=1000).contains(&self.player.tick_ms) {
            // The sleep timer must be evaluated at least once per second.
            return Err("player.tick_ms must be between 1 and 1000".to_string());
        }
        if !is_positive_minutes(self.sleep_timer.default_minutes) {
            return Err("sleep_timer.default_minutes must be > 0".to_string());
        }
        if let Some(bad) = self
            .sleep_timer
            .presets_minutes
            .iter()
            .find(|m| !is_positive_minutes(**m))
        {
            return Err(format!("sleep_timer.presets_minutes contains invalid value {bad}"));
        }
        if self.library.extensions.is_empty() && self.library.video_extensions.is_empty() {
            return Err("library.extensions and library.video_extensions are both empty".to_string());
        }
        Ok(())
    }

    /// Render the effective settings as TOML (used by `--print-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn is_positive_minutes(m: f64) -> bool {
    m.is_finite() && m > 0.0
}

/// Resolve the config path from `SOUL_PLAYER_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SOUL_PLAYER_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/soul_player/config.toml`
/// or `~/.config/soul_player/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("soul_player").join("config.toml"))
}
