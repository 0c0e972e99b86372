//! Bookkeeping for optimistic status moves that are still waiting on the
//! server.
//!
//! Each move gets a monotonically increasing sequence number. Responses can
//! arrive in any order, so they are interpreted by sequence, never by arrival:
//!
//! * a success newer than the last confirmation becomes the known-good status;
//! * a failure of the most recent move restores the known-good status;
//! * a failure of an older move is ignored for display purposes, because a
//!   newer move owns what the board shows;
//! * if the most recent move failed and an older move then succeeds, the board
//!   follows the newly confirmed status.

use crate::models::{IssueId, IssueStatus};

/// Result of a detached status update, posted back to the owning store.
#[derive(Debug)]
pub struct MoveOutcome {
    pub issue_id: IssueId,
    pub seq: u64,
    pub generation: u64,
    pub status: IssueStatus,
    pub result: crate::error::KanbanResult<()>,
}

/// What a settled response means for the displayed status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The response confirms what is displayed.
    Confirmed,
    /// A newer move owns the display; nothing to change.
    Superseded,
    /// Display must show this known-good status.
    Restore(IssueStatus),
}

#[derive(Debug, Clone)]
pub struct PendingMoves {
    confirmed: IssueStatus,
    confirmed_seq: u64,
    latest_seq: u64,
    latest_failed: bool,
    in_flight: usize,
}

impl PendingMoves {
    /// `known_good` is the status captured before the first optimistic write.
    pub fn new(known_good: IssueStatus) -> Self {
        Self {
            confirmed: known_good,
            confirmed_seq: 0,
            latest_seq: 0,
            latest_failed: false,
            in_flight: 0,
        }
    }

    pub fn begin(&mut self, seq: u64) {
        debug_assert!(seq > self.latest_seq, "sequence numbers must increase");
        self.latest_seq = seq;
        self.latest_failed = false;
        self.in_flight += 1;
    }

    pub fn settle(&mut self, seq: u64, status: IssueStatus, succeeded: bool) -> Settlement {
        debug_assert!(
            self.in_flight > 0 && seq <= self.latest_seq,
            "settled move #{} that was never begun",
            seq
        );
        self.in_flight = self.in_flight.saturating_sub(1);

        if succeeded {
            if seq > self.confirmed_seq {
                self.confirmed = status;
                self.confirmed_seq = seq;
            }
            if self.latest_failed {
                Settlement::Restore(self.confirmed)
            } else if seq == self.latest_seq {
                Settlement::Confirmed
            } else {
                Settlement::Superseded
            }
        } else if seq == self.latest_seq {
            self.latest_failed = true;
            Settlement::Restore(self.confirmed)
        } else {
            Settlement::Superseded
        }
    }

    pub fn known_good(&self) -> IssueStatus {
        self.confirmed
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use IssueStatus::*;

    #[test]
    fn test_single_success_confirms() {
        let mut pending = PendingMoves::new(ToDo);
        pending.begin(1);
        assert_eq!(pending.settle(1, Done, true), Settlement::Confirmed);
        assert_eq!(pending.known_good(), Done);
        assert!(pending.is_idle());
    }

    #[test]
    fn test_single_failure_restores_captured_status() {
        let mut pending = PendingMoves::new(ToDo);
        pending.begin(1);
        assert_eq!(pending.settle(1, Done, false), Settlement::Restore(ToDo));
        assert!(pending.is_idle());
    }

    #[test]
    fn test_old_failure_after_newer_success_is_ignored() {
        let mut pending = PendingMoves::new(ToDo);
        pending.begin(1);
        pending.begin(2);
        assert_eq!(pending.settle(2, Done, true), Settlement::Confirmed);
        assert_eq!(pending.settle(1, InProgress, false), Settlement::Superseded);
        assert_eq!(pending.known_good(), Done);
    }

    #[test]
    fn test_old_failure_while_newer_in_flight_is_ignored() {
        let mut pending = PendingMoves::new(ToDo);
        pending.begin(1);
        pending.begin(2);
        assert_eq!(pending.settle(1, InProgress, false), Settlement::Superseded);
        assert_eq!(pending.in_flight(), 1);
        assert_eq!(pending.settle(2, Done, true), Settlement::Confirmed);
    }

    #[test]
    fn test_late_old_success_does_not_override_newer_confirmation() {
        let mut pending = PendingMoves::new(ToDo);
        pending.begin(1);
        pending.begin(2);
        assert_eq!(pending.settle(2, Done, true), Settlement::Confirmed);
        assert_eq!(pending.settle(1, InProgress, true), Settlement::Superseded);
        assert_eq!(pending.known_good(), Done);
    }

    #[test]
    fn test_newest_failure_restores_older_confirmation() {
        let mut pending = PendingMoves::new(ToDo);
        pending.begin(1);
        pending.begin(2);
        assert_eq!(pending.settle(1, InProgress, true), Settlement::Superseded);
        assert_eq!(pending.settle(2, Done, false), Settlement::Restore(InProgress));
    }

    #[test]
    fn test_older_success_after_newest_failure_is_followed() {
        let mut pending = PendingMoves::new(ToDo);
        pending.begin(1);
        pending.begin(2);
        assert_eq!(pending.settle(2, Done, false), Settlement::Restore(ToDo));
        assert_eq!(pending.settle(1, InProgress, true), Settlement::Restore(InProgress));
        assert_eq!(pending.latest_seq(), 2);
    }

    #[test]
    fn test_new_move_clears_failed_flag() {
        let mut pending = PendingMoves::new(ToDo);
        pending.begin(1);
        pending.settle(1, Done, false);
        pending.begin(2);
        assert_eq!(pending.settle(2, InProgress, true), Settlement::Confirmed);
    }
}
