use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::reconcile::{MoveOutcome, PendingMoves, Settlement};
use crate::board::{self, Lane};
use crate::client::IssueGateway;
use crate::constants::{
    CREATE_ISSUE_FAILED, DELETE_ISSUE_FAILED, FETCH_ISSUES_FAILED, FETCH_ISSUE_FAILED,
    MOVE_ISSUE_FAILED, UPDATE_ISSUE_FAILED,
};
use crate::error::{KanbanError, KanbanResult};
use crate::logging::{log_debug, log_error, log_info};
use crate::models::{Issue, IssueDraft, IssueId, IssueStatus, ProjectId};
use crate::validation::Validate;

/// Receipt for an optimistic move. The board already shows `status` when
/// this is returned; the server's answer arrives later as a [`Reconciliation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTicket {
    pub issue_id: IssueId,
    pub seq: u64,
    pub previous_status: IssueStatus,
    pub status: IssueStatus,
}

/// How one server response to a move was folded into local state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The server accepted the move that is on screen.
    Confirmed { issue_id: IssueId, status: IssueStatus },
    /// The display was reset to the last known-good status.
    RolledBack {
        issue_id: IssueId,
        attempted: IssueStatus,
        restored: IssueStatus,
        error: String,
    },
    /// An older response that a newer move already made irrelevant, or a
    /// failure for an issue that was since updated or deleted.
    Superseded { issue_id: IssueId },
    /// A response for a collection that has since been replaced.
    Stale { issue_id: IssueId },
}

/// In-memory issues of the active project, and the only writer to them.
///
/// Board moves are optimistic: [`move_issue`](Self::move_issue) mutates
/// synchronously and persists in a detached task, whose response comes back
/// through an internal queue and is applied by [`drain_outcomes`]
/// (non-blocking) or [`settle`] (awaits every pending move). Form edits
/// (create, update, delete) wait for the server and apply only the confirmed
/// response.
///
/// [`drain_outcomes`]: Self::drain_outcomes
/// [`settle`]: Self::settle
pub struct IssueStore {
    gateway: Arc<dyn IssueGateway>,
    issues: Vec<Issue>,
    project_id: Option<ProjectId>,
    loading: bool,
    error: Option<String>,
    // bumped whenever the collection is replaced wholesale
    generation: u64,
    next_seq: u64,
    pending: HashMap<IssueId, PendingMoves>,
    // highest move seq per issue that a confirmed call has overtaken
    overtaken: HashMap<IssueId, u64>,
    outcomes_tx: mpsc::UnboundedSender<MoveOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<MoveOutcome>,
}

impl IssueStore {
    pub fn new(gateway: Arc<dyn IssueGateway>) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            issues: Vec::new(),
            project_id: None,
            loading: false,
            error: None,
            generation: 0,
            next_seq: 0,
            pending: HashMap::new(),
            overtaken: HashMap::new(),
            outcomes_tx,
            outcomes_rx,
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn issue(&self, issue_id: IssueId) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.id == issue_id)
    }

    pub fn lanes(&self) -> [Lane<'_>; 3] {
        board::partition(&self.issues)
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn has_pending_moves(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_moves(&self, issue_id: IssueId) -> usize {
        self.pending.get(&issue_id).map_or(0, PendingMoves::in_flight)
    }

    fn position(&self, issue_id: IssueId) -> Option<usize> {
        self.issues.iter().position(|issue| issue.id == issue_id)
    }

    /// Forgets the moves of an issue that a confirmed response has replaced.
    /// Their responses still arrive later and must not touch newer moves.
    fn discard_pending(&mut self, issue_id: IssueId) {
        self.pending.remove(&issue_id);
        self.overtaken.insert(issue_id, self.next_seq);
    }

    fn record_error(&mut self, error: &KanbanError, fallback: &str) -> String {
        let message = error.user_message(fallback);
        log_error(&format!("{}: {}", fallback, error));
        self.error = Some(message.clone());
        message
    }

    /// Replaces the whole collection with the project's issues.
    ///
    /// Any move still in flight belongs to the old collection; its response is
    /// discarded when it arrives.
    pub async fn fetch_issues(&mut self, project_id: ProjectId) -> KanbanResult<()> {
        self.generation += 1;
        self.pending.clear();
        self.overtaken.clear();
        if self.project_id != Some(project_id) {
            self.issues.clear();
        }
        self.project_id = Some(project_id);
        self.loading = true;
        self.error = None;
        log_debug(&format!(
            "Fetching issues for project {} (generation {})",
            project_id, self.generation
        ));

        let result = self.gateway.list_issues(project_id).await;
        self.loading = false;

        match result {
            Ok(issues) => {
                log_info(&format!("Loaded {} issues for project {}", issues.len(), project_id));
                self.issues = issues;
                Ok(())
            }
            Err(e) => {
                self.record_error(&e, FETCH_ISSUES_FAILED);
                Err(e)
            }
        }
    }

    /// Optimistically moves an issue to another lane.
    ///
    /// The new status is visible as soon as this returns; persistence happens
    /// in a detached task. Must be called from within a tokio runtime.
    pub fn move_issue(&mut self, issue_id: IssueId, status: IssueStatus) -> KanbanResult<MoveTicket> {
        let index = self
            .position(issue_id)
            .ok_or(KanbanError::IssueNotFound(issue_id))?;

        // snapshot before the write; rollback must never re-read
        let previous_status = self.issues[index].status;
        self.issues[index].status = status;

        self.next_seq += 1;
        let seq = self.next_seq;
        self.pending
            .entry(issue_id)
            .or_insert_with(|| PendingMoves::new(previous_status))
            .begin(seq);

        log_debug(&format!(
            "Move #{}: issue {} {} -> {}",
            seq, issue_id, previous_status, status
        ));

        let gateway = Arc::clone(&self.gateway);
        let outcomes = self.outcomes_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = gateway.update_issue_status(issue_id, status).await;
            // the store may be gone; nothing left to reconcile then
            let _ = outcomes.send(MoveOutcome {
                issue_id,
                seq,
                generation,
                status,
                result,
            });
        });

        Ok(MoveTicket {
            issue_id,
            seq,
            previous_status,
            status,
        })
    }

    /// Applies every move response that has already arrived, without waiting.
    pub fn drain_outcomes(&mut self) -> Vec<Reconciliation> {
        let mut applied = Vec::new();
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            applied.push(self.apply_outcome(outcome));
        }
        applied
    }

    /// Waits until every move of the current collection has been answered.
    pub async fn settle(&mut self) -> Vec<Reconciliation> {
        let mut applied = Vec::new();
        while self.has_pending_moves() {
            match self.outcomes_rx.recv().await {
                Some(outcome) => applied.push(self.apply_outcome(outcome)),
                None => break,
            }
        }
        applied
    }

    fn apply_outcome(&mut self, outcome: MoveOutcome) -> Reconciliation {
        let MoveOutcome {
            issue_id,
            seq,
            generation,
            status,
            result,
        } = outcome;

        if generation != self.generation {
            log_debug(&format!(
                "Discarding move #{} for issue {} from generation {}",
                seq, issue_id, generation
            ));
            return Reconciliation::Stale { issue_id };
        }

        let error = result
            .err()
            .map(|e| self.record_error(&e, MOVE_ISSUE_FAILED));

        if self
            .overtaken
            .get(&issue_id)
            .is_some_and(|&watermark| seq <= watermark)
        {
            log_debug(&format!(
                "Move #{} for issue {} was overtaken by a confirmed update",
                seq, issue_id
            ));
            return Reconciliation::Superseded { issue_id };
        }

        let Some(pending) = self.pending.get_mut(&issue_id) else {
            log_error(&format!("Move #{} for issue {} has no pending entry", seq, issue_id));
            return Reconciliation::Superseded { issue_id };
        };

        let settlement = pending.settle(seq, status, error.is_none());
        log_debug(&format!(
            "Move #{} for issue {} settled as {:?} (latest #{}, known good {})",
            seq,
            issue_id,
            settlement,
            pending.latest_seq(),
            pending.known_good()
        ));
        if pending.is_idle() {
            self.pending.remove(&issue_id);
        }

        match (settlement, error) {
            (Settlement::Restore(restored), error) => {
                if let Some(index) = self.position(issue_id) {
                    self.issues[index].status = restored;
                }
                match error {
                    Some(error) => {
                        log_info(&format!(
                            "Rolled back issue {} to {} after failed move to {}",
                            issue_id, restored, status
                        ));
                        Reconciliation::RolledBack {
                            issue_id,
                            attempted: status,
                            restored,
                            error,
                        }
                    }
                    None => Reconciliation::Confirmed {
                        issue_id,
                        status: restored,
                    },
                }
            }
            (Settlement::Confirmed, _) => Reconciliation::Confirmed { issue_id, status },
            (Settlement::Superseded, _) => Reconciliation::Superseded { issue_id },
        }
    }

    /// Re-reads one issue from the server and upserts it.
    pub async fn get_issue(&mut self, issue_id: IssueId) -> KanbanResult<Issue> {
        self.loading = true;
        self.error = None;
        let result = self.gateway.get_issue(issue_id).await;
        self.loading = false;

        match result {
            Ok(issue) => {
                self.discard_pending(issue_id);
                if self.project_id == Some(issue.project_id) {
                    match self.position(issue_id) {
                        Some(index) => self.issues[index] = issue.clone(),
                        None => self.issues.push(issue.clone()),
                    }
                }
                Ok(issue)
            }
            Err(e) => {
                self.record_error(&e, FETCH_ISSUE_FAILED);
                Err(e)
            }
        }
    }

    pub async fn create_issue(&mut self, draft: IssueDraft) -> KanbanResult<Issue> {
        draft.validate()?;

        self.loading = true;
        self.error = None;
        let result = self.gateway.create_issue(&draft).await;
        self.loading = false;

        match result {
            Ok(issue) => {
                log_info(&format!("Created issue {} in project {}", issue.id, issue.project_id));
                if self.project_id == Some(issue.project_id) {
                    self.issues.push(issue.clone());
                }
                Ok(issue)
            }
            Err(e) => {
                self.record_error(&e, CREATE_ISSUE_FAILED);
                Err(e)
            }
        }
    }

    pub async fn update_issue(&mut self, issue_id: IssueId, draft: IssueDraft) -> KanbanResult<Issue> {
        draft.validate()?;

        self.loading = true;
        self.error = None;
        let result = self.gateway.update_issue(issue_id, &draft).await;
        self.loading = false;

        match result {
            Ok(issue) => {
                // the confirmed response outranks any move still in flight
                self.discard_pending(issue_id);
                if let Some(index) = self.position(issue_id) {
                    self.issues[index] = issue.clone();
                }
                Ok(issue)
            }
            Err(e) => {
                self.record_error(&e, UPDATE_ISSUE_FAILED);
                Err(e)
            }
        }
    }

    pub async fn delete_issue(&mut self, issue_id: IssueId) -> KanbanResult<()> {
        self.loading = true;
        self.error = None;
        let result = self.gateway.delete_issue(issue_id).await;
        self.loading = false;

        match result {
            Ok(()) => {
                self.discard_pending(issue_id);
                self.issues.retain(|issue| issue.id != issue_id);
                Ok(())
            }
            Err(e) => {
                self.record_error(&e, DELETE_ISSUE_FAILED);
                Err(e)
            }
        }
    }
}
