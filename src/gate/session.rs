//! Transaction session state.

use serde::Serialize;
use std::time::Instant;

/// Where the gate stands with respect to an open transaction.
///
/// `Open` always holds at least one counted write and exactly one armed
/// deferred commit; re-arming overwrites `commit_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Closed,
    Open { pending: usize, commit_at: Instant },
}

impl Session {
    pub fn is_open(&self) -> bool {
        matches!(self, Session::Open { .. })
    }

    pub fn pending(&self) -> usize {
        match self {
            Session::Closed => 0,
            Session::Open { pending, .. } => *pending,
        }
    }

    pub fn commit_at(&self) -> Option<Instant> {
        match self {
            Session::Closed => None,
            Session::Open { commit_at, .. } => Some(*commit_at),
        }
    }

    /// Count one more write and push the deferred commit to `commit_at`.
    pub fn record_write(&mut self, commit_at: Instant) {
        *self = Session::Open {
            pending: self.pending() + 1,
            commit_at,
        };
    }

    /// Re-arm the deferred commit without counting a write.
    pub fn rearm(&mut self, at: Instant) {
        if let Session::Open { commit_at, .. } = self {
            *commit_at = at;
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.commit_at().is_some_and(|at| now >= at)
    }
}

/// Counters kept for the lifetime of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GateStats {
    pub reads: u64,
    pub writes: u64,
    pub transactions_committed: u64,
    pub statements_committed: u64,
    pub rollbacks: u64,
}
