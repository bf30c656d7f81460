//! Error taxonomy for the player.
//!
//! Hardware failures are caught at the binding/guard boundary and turned into
//! session state changes plus a [`PlaybackError`] notice; nothing here is meant
//! to unwind through the player thread.

use std::io;

use thiserror::Error;

/// Failures surfaced to the rendering layer as transient notices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Hardware refused to start the track for a reason other than supersession.
    #[error("could not start \"{track}\": {reason}")]
    StartFailed { track: String, reason: String },
    /// Hardware reported an error after playback had started.
    #[error("playback of \"{track}\" stopped: {reason}")]
    Runtime { track: String, reason: String },
    /// The track has no usable url; nothing was loaded.
    #[error("\"{name}\" has no playable url")]
    TrackUnplayable { name: String },
}

/// Outcome of a hardware start request that did not begin playback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    /// Overtaken by a newer pause, start or load. Internal only.
    #[error("superseded by a newer request")]
    Aborted,
    #[error("resource unavailable: {0}")]
    Unavailable(String),
    #[error("unsupported media: {0}")]
    Unsupported(String),
}

impl StartError {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

impl From<BackendError> for StartError {
    fn from(err: BackendError) -> Self {
        match &err {
            BackendError::Io { .. } | BackendError::Output(_) => Self::Unavailable(err.to_string()),
            BackendError::UnsupportedScheme(_) | BackendError::Decode { .. } => {
                Self::Unsupported(err.to_string())
            }
        }
    }
}

/// Failures opening a platform media handle.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("no audio output: {0}")]
    Output(String),
}

/// Failures listing practices.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog request was not successful (status {0:?})")]
    Rejected(String),
}

/// Failures parsing a front-end command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{command}`: {value:?} is not a valid {expected}")]
    InvalidArgument {
        command: &'static str,
        value: String,
        expected: &'static str,
    },
}
