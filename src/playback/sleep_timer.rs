use std::time::{Duration, Instant};

#[derive(Debug, Copy, Clone, PartialEq)]
struct Armed {
    minutes: f64,
    armed_at: Instant,
}

impl Armed {
    fn total(&self) -> Duration {
        Duration::try_from_secs_f64(self.minutes * 60.0).unwrap_or(Duration::MAX)
    }
}

/// Wall-clock countdown after which playback is paused.
///
/// Pure state: the player decides when to evaluate it (only while playing
/// with a track loaded) and what to do on expiry.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SleepTimer {
    armed: Option<Armed>,
}

impl SleepTimer {
    /// Arm for `minutes` from `now`, replacing any previous countdown.
    /// `None` or a non-finite value disarms; negative values expire at once.
    pub fn arm(&mut self, minutes: Option<f64>, now: Instant) {
        self.armed = minutes.filter(|m| m.is_finite()).map(|m| Armed {
            minutes: m.max(0.0),
            armed_at: now,
        });
    }

    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn minutes(&self) -> Option<f64> {
        self.armed.map(|a| a.minutes)
    }

    /// Time left, or `None` when disarmed. Never mutates.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.armed.map(|a| {
            a.total()
                .saturating_sub(now.saturating_duration_since(a.armed_at))
        })
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.remaining(now).is_some_and(|r| r.is_zero())
    }
}
