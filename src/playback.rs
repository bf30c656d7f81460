//! Playback session manager.
//!
//! [`Player`] owns the [`PlaybackSession`], the media binding and the
//! start/stop transaction guard. Everything runs on one thread; hardware
//! completions arrive as media events and are applied by [`Player::pump`].

mod controller;
mod guard;
mod session;
mod sleep_timer;
mod visibility;

pub use controller::Player;
pub use session::{PlaybackSession, PlaybackState, SessionSnapshot};
pub use visibility::Visibility;

#[cfg(test)]
mod tests;
