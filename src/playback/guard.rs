//! Serialisation of hardware start/stop requests.
//!
//! At most one start is outstanding. A start requested while another is in
//! flight waits for it to settle (whatever the outcome) and is then issued
//! under a fresh ticket. A stop marks the outstanding start as superseded so
//! its outcome no longer drives session state. The guard never touches the
//! handle itself; it tells the caller what to do.

use crate::error::StartError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Outstanding {
    ticket: u64,
    superseded: bool,
}

#[derive(Debug, Default)]
pub struct TransactionGuard {
    last_ticket: u64,
    outstanding: Option<Outstanding>,
    restart_queued: bool,
}

/// What the caller should do after a start settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// Unknown ticket: from a torn-down handle, or already settled.
    Stale,
    /// The current attempt succeeded.
    Started,
    /// A start queued behind the settled one may now be issued with this ticket.
    Reissue(u64),
    /// A superseded attempt reached the hardware anyway; pause it again.
    Reconcile,
    /// Superseded or aborted attempt; nothing to do.
    Discarded,
    /// The current attempt genuinely failed.
    Failed(StartError),
}

impl TransactionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask to start. Returns the ticket to issue now, or `None` when the start
    /// was queued behind an outstanding one.
    pub fn request_start(&mut self) -> Option<u64> {
        if self.outstanding.is_some() {
            self.restart_queued = true;
            return None;
        }
        Some(self.issue())
    }

    /// Record a stop. The caller pauses the hardware synchronously.
    pub fn request_stop(&mut self) {
        self.restart_queued = false;
        if let Some(o) = self.outstanding.as_mut() {
            o.superseded = true;
        }
    }

    pub fn settle(&mut self, ticket: u64, result: Result<(), StartError>) -> Settlement {
        let Some(settled) = self.outstanding.filter(|o| o.ticket == ticket) else {
            return Settlement::Stale;
        };
        self.outstanding = None;

        if self.restart_queued {
            self.restart_queued = false;
            return Settlement::Reissue(self.issue());
        }

        match (settled.superseded, result) {
            (true, Ok(())) => Settlement::Reconcile,
            (true, Err(_)) => Settlement::Discarded,
            (false, Ok(())) => Settlement::Started,
            (false, Err(err)) if err.is_superseded() => Settlement::Discarded,
            (false, Err(err)) => Settlement::Failed(err),
        }
    }

    /// Forget everything in flight; used when the handle is torn down.
    pub fn reset(&mut self) {
        self.outstanding = None;
        self.restart_queued = false;
    }

    pub fn is_pending(&self) -> bool {
        self.outstanding.is_some()
    }

    fn issue(&mut self) -> u64 {
        self.last_ticket += 1;
        self.outstanding = Some(Outstanding {
            ticket: self.last_ticket,
            superseded: false,
        });
        self.last_ticket
    }
}
