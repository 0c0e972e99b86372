use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::board::{Board, DragPayload, IssueCard};
use crate::constants::NOTIFICATION_TTL_SECS;
use crate::logging::log_debug;
use crate::models::{Issue, IssueDraft, IssueId, IssueStatus, Project};
use crate::store::{IssueStore, Reconciliation};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppMode {
    Normal,
    /// A card is picked up and follows the lane focus until dropped.
    Grabbing,
    ConfirmDelete(IssueId),
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationKind {
    Success,
    Error,
    Loading,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Instant,
    pub dismissed: bool,
}

/// Work the key handler hands back to the run loop because it needs to
/// await the server or suspend the terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    Refresh,
    EditDescription(IssueId),
    Delete(IssueId),
}

pub struct BoardApp {
    pub project: Project,
    pub store: IssueStore,
    pub mode: AppMode,
    /// Focused lane, left to right.
    pub lane: usize,
    /// Selected card in each lane.
    pub cursors: [usize; 3],
    pub grabbed: Option<DragPayload>,
    pub notifications: Vec<Notification>,
    pub should_quit: bool,
}

impl BoardApp {
    pub fn new(project: Project, store: IssueStore) -> Self {
        Self {
            project,
            store,
            mode: AppMode::Normal,
            lane: 0,
            cursors: [0; 3],
            grabbed: None,
            notifications: Vec::new(),
            should_quit: false,
        }
    }

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notifications.push(Notification {
            message: message.into(),
            kind,
            created_at: Instant::now(),
            dismissed: false,
        });
    }

    pub fn active_notifications(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.notifications.iter().filter(|n| !n.dismissed)
    }

    pub fn focused_status(&self) -> IssueStatus {
        IssueStatus::from_index(self.lane).unwrap_or(IssueStatus::ToDo)
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        let lanes = self.store.lanes();
        lanes[self.lane].get(self.cursors[self.lane])
    }

    /// Keeps every cursor inside its lane after the collection changed.
    fn clamp_cursors(&mut self) {
        let lengths = self.store.lanes().map(|lane| lane.len());
        for (cursor, len) in self.cursors.iter_mut().zip(lengths) {
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
    }

    fn focus_issue(&mut self, issue_id: IssueId) {
        let lanes = self.store.lanes();
        for (index, lane) in lanes.iter().enumerate() {
            if let Some(position) = lane.position(issue_id) {
                self.lane = index;
                self.cursors[index] = position;
                return;
            }
        }
    }

    pub async fn refresh(&mut self) {
        self.notify(NotificationKind::Loading, "Loading issues...");
        let result = self.store.fetch_issues(self.project.id).await;
        self.notifications
            .retain(|n| n.kind != NotificationKind::Loading);

        match result {
            Ok(()) => {
                self.grabbed = None;
                if self.mode == AppMode::Grabbing {
                    self.mode = AppMode::Normal;
                }
                self.clamp_cursors();
            }
            Err(_) => {
                let message = self.store.error().unwrap_or("Failed to fetch issues").to_string();
                self.notify(NotificationKind::Error, message);
            }
        }
    }

    /// Applies any move responses that arrived and expires old notifications.
    pub fn on_tick(&mut self) {
        for reconciliation in self.store.drain_outcomes() {
            if let Reconciliation::RolledBack {
                issue_id,
                attempted,
                restored,
                error,
            } = reconciliation
            {
                self.notify(
                    NotificationKind::Error,
                    format!(
                        "#{} could not move to {} ({}); back in {}",
                        issue_id, attempted, error, restored
                    ),
                );
            }
        }
        self.clamp_cursors();

        let ttl = Duration::from_secs(NOTIFICATION_TTL_SECS);
        for notification in &mut self.notifications {
            let expires = matches!(
                notification.kind,
                NotificationKind::Success | NotificationKind::Info
            );
            if expires && notification.created_at.elapsed() >= ttl {
                notification.dismissed = true;
            }
        }
        self.notifications.retain(|n| !n.dismissed);
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Action {
        match self.mode {
            AppMode::Normal => self.handle_normal_mode_key(key),
            AppMode::Grabbing => {
                self.handle_grabbing_mode_key(key);
                Action::None
            }
            AppMode::ConfirmDelete(issue_id) => self.handle_confirm_key(key, issue_id),
            AppMode::Help => {
                self.mode = AppMode::Normal;
                Action::None
            }
        }
    }

    fn handle_normal_mode_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::Left => self.focus_lane_left(),
            KeyCode::Char('l') | KeyCode::Right => self.focus_lane_right(),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection_up(),
            KeyCode::Char(' ') => self.grab_selected(),
            KeyCode::Char('<') => {
                if let Some(issue) = self.selected_issue() {
                    let target = issue.status.previous();
                    self.drop_selected(target);
                }
            }
            KeyCode::Char('>') => {
                if let Some(issue) = self.selected_issue() {
                    let target = issue.status.next();
                    self.drop_selected(target);
                }
            }
            KeyCode::Char(c @ '1'..='3') => {
                if let Some(target) = lane_for_digit(c) {
                    self.drop_selected(target);
                }
            }
            KeyCode::Char('e') => {
                if let Some(issue) = self.selected_issue() {
                    return Action::EditDescription(issue.id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(issue) = self.selected_issue() {
                    self.mode = AppMode::ConfirmDelete(issue.id);
                }
            }
            KeyCode::Char('r') => return Action::Refresh,
            KeyCode::Char('c') => self.store.clear_error(),
            KeyCode::Char('?') => self.mode = AppMode::Help,
            _ => {}
        }
        Action::None
    }

    fn handle_grabbing_mode_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.cancel_grab(),
            KeyCode::Char('h') | KeyCode::Left => self.focus_lane_left(),
            KeyCode::Char('l') | KeyCode::Right => self.focus_lane_right(),
            KeyCode::Char(' ') | KeyCode::Enter => {
                let target = self.focused_status();
                self.drop_grabbed(target);
            }
            KeyCode::Char(c @ '1'..='3') => {
                if let Some(target) = lane_for_digit(c) {
                    self.drop_grabbed(target);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyCode, issue_id: IssueId) -> Action {
        self.mode = AppMode::Normal;
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Action::Delete(issue_id),
            _ => Action::None,
        }
    }

    fn focus_lane_left(&mut self) {
        self.lane = self.lane.saturating_sub(1);
    }

    fn focus_lane_right(&mut self) {
        self.lane = (self.lane + 1).min(IssueStatus::ALL.len() - 1);
    }

    fn move_selection_down(&mut self) {
        let len = self.store.lanes()[self.lane].len();
        if len > 0 {
            self.cursors[self.lane] = (self.cursors[self.lane] + 1) % len;
        }
    }

    fn move_selection_up(&mut self) {
        let len = self.store.lanes()[self.lane].len();
        if len > 0 {
            let cursor = &mut self.cursors[self.lane];
            *cursor = if *cursor == 0 { len - 1 } else { *cursor - 1 };
        }
    }

    fn grab_selected(&mut self) {
        let Some(payload) = self.selected_issue().map(|issue| IssueCard::new(issue).drag()) else {
            return;
        };
        log_debug(&format!("Grabbed issue {}", payload.issue_id));
        self.grabbed = Some(payload);
        self.mode = AppMode::Grabbing;
    }

    fn cancel_grab(&mut self) {
        if let Some(payload) = self.grabbed.take() {
            self.lane = payload.status.index();
        }
        self.mode = AppMode::Normal;
    }

    fn drop_grabbed(&mut self, target: IssueStatus) {
        self.mode = AppMode::Normal;
        if let Some(payload) = self.grabbed.take() {
            self.drop_payload(payload, target);
        }
    }

    fn drop_selected(&mut self, target: IssueStatus) {
        if let Some(payload) = self.selected_issue().map(|issue| IssueCard::new(issue).drag()) {
            self.drop_payload(payload, target);
        }
    }

    fn drop_payload(&mut self, payload: DragPayload, target: IssueStatus) {
        match Board::drop(&mut self.store, payload.drop_on(target)) {
            Ok(ticket) => self.focus_issue(ticket.issue_id),
            Err(e) => self.notify(NotificationKind::Error, e.to_string()),
        }
        self.clamp_cursors();
    }

    /// Saves an edited description through the confirmed update path.
    /// `None` means the editor was closed without saving.
    pub async fn apply_description(&mut self, issue_id: IssueId, edited: Option<String>) {
        let Some(edited) = edited else {
            self.notify(NotificationKind::Info, "Edit cancelled");
            return;
        };
        let Some(issue) = self.store.issue(issue_id) else {
            return;
        };
        if issue.description.as_deref().unwrap_or("") == edited {
            return;
        }

        let mut draft = IssueDraft::from(issue);
        draft.description = (!edited.trim().is_empty()).then_some(edited);

        match self.store.update_issue(issue_id, draft).await {
            Ok(issue) => self.notify(NotificationKind::Success, format!("Updated #{}", issue.id)),
            Err(e) => {
                let message = self
                    .store
                    .error()
                    .map(str::to_string)
                    .unwrap_or_else(|| e.to_string());
                self.notify(NotificationKind::Error, message);
            }
        }
    }

    pub async fn delete_issue(&mut self, issue_id: IssueId) {
        match self.store.delete_issue(issue_id).await {
            Ok(()) => self.notify(NotificationKind::Success, format!("Deleted #{}", issue_id)),
            Err(_) => {
                let message = self.store.error().unwrap_or("Failed to delete issue").to_string();
                self.notify(NotificationKind::Error, message);
            }
        }
        self.clamp_cursors();
    }
}

fn lane_for_digit(c: char) -> Option<IssueStatus> {
    c.to_digit(10)
        .and_then(|d| (d as usize).checked_sub(1))
        .and_then(IssueStatus::from_index)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::{Failure, InMemoryGateway, Operation};
    use crate::models::IssuePriority;

    fn issue(id: IssueId, status: IssueStatus) -> Issue {
        Issue {
            id,
            title: format!("Issue {}", id),
            description: None,
            status,
            priority: IssuePriority::Medium,
            assignee_id: None,
            project_id: 1,
        }
    }

    async fn app_with(issues: Vec<Issue>) -> (Arc<InMemoryGateway>, BoardApp) {
        let gateway = Arc::new(InMemoryGateway::with_issues(issues));
        let project = Project {
            id: 1,
            name: "Apollo".to_string(),
            description: None,
            owner_id: 1,
        };
        let mut app = BoardApp::new(project, IssueStore::new(gateway.clone()));
        app.refresh().await;
        (gateway, app)
    }

    #[tokio::test]
    async fn test_grab_and_drop_moves_card() {
        let (gateway, mut app) = app_with(vec![issue(1, IssueStatus::ToDo)]).await;
        let _gate = gateway.hold_status_update(1, IssueStatus::Done);

        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.mode, AppMode::Grabbing);
        app.handle_key(KeyCode::Char('l'));
        app.handle_key(KeyCode::Char('l'));
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.store.issue(1).unwrap().status, IssueStatus::Done);
        assert_eq!(app.lane, 2);
        assert_eq!(app.selected_issue().map(|i| i.id), Some(1));
    }

    #[tokio::test]
    async fn test_escape_cancels_grab() {
        let (gateway, mut app) = app_with(vec![issue(1, IssueStatus::ToDo)]).await;

        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('l'));
        app.handle_key(KeyCode::Esc);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.lane, 0);
        assert!(app.grabbed.is_none());
        assert_eq!(gateway.call_count(Operation::UpdateIssueStatus), 0);
    }

    #[tokio::test]
    async fn test_adjacent_lane_shortcut() {
        let (_gateway, mut app) = app_with(vec![issue(1, IssueStatus::InProgress)]).await;
        app.lane = 1;

        app.handle_key(KeyCode::Char('>'));
        assert_eq!(app.store.issue(1).unwrap().status, IssueStatus::Done);

        app.handle_key(KeyCode::Char('<'));
        assert_eq!(app.store.issue(1).unwrap().status, IssueStatus::InProgress);
        assert_eq!(app.store.pending_moves(1), 2);
    }

    #[tokio::test]
    async fn test_rollback_raises_notification() {
        let (gateway, mut app) = app_with(vec![issue(1, IssueStatus::ToDo)]).await;
        gateway.fail(Operation::UpdateIssueStatus, Failure::network());

        app.handle_key(KeyCode::Char('3'));
        assert_eq!(app.store.issue(1).unwrap().status, IssueStatus::Done);

        while app.store.has_pending_moves() {
            tokio::task::yield_now().await;
            app.on_tick();
        }

        assert_eq!(app.store.issue(1).unwrap().status, IssueStatus::ToDo);
        assert_eq!(app.store.error(), Some("Failed to update issue status"));
        assert!(app
            .active_notifications()
            .any(|n| n.kind == NotificationKind::Error));

        app.handle_key(KeyCode::Char('c'));
        assert!(app.store.error().is_none());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (_gateway, mut app) = app_with(vec![issue(1, IssueStatus::ToDo)]).await;

        assert_eq!(app.handle_key(KeyCode::Char('d')), Action::None);
        assert_eq!(app.mode, AppMode::ConfirmDelete(1));
        assert_eq!(app.handle_key(KeyCode::Char('n')), Action::None);

        app.handle_key(KeyCode::Char('d'));
        assert_eq!(app.handle_key(KeyCode::Char('y')), Action::Delete(1));

        app.delete_issue(1).await;
        assert!(app.store.issues().is_empty());
        assert!(app.selected_issue().is_none());
    }

    #[tokio::test]
    async fn test_edit_description_round_trip() {
        let (gateway, mut app) = app_with(vec![issue(1, IssueStatus::ToDo)]).await;

        assert_eq!(app.handle_key(KeyCode::Char('e')), Action::EditDescription(1));
        app.apply_description(1, Some("Steps to reproduce".to_string())).await;

        assert_eq!(
            app.store.issue(1).unwrap().description.as_deref(),
            Some("Steps to reproduce")
        );
        assert_eq!(gateway.call_count(Operation::UpdateIssue), 1);

        // unchanged text does not hit the server
        app.apply_description(1, Some("Steps to reproduce".to_string())).await;
        assert_eq!(gateway.call_count(Operation::UpdateIssue), 1);
    }

    #[tokio::test]
    async fn test_cursor_wraps_within_lane() {
        let (_gateway, mut app) = app_with(vec![
            issue(1, IssueStatus::ToDo),
            issue(2, IssueStatus::ToDo),
        ])
        .await;

        app.handle_key(KeyCode::Char('k'));
        assert_eq!(app.selected_issue().map(|i| i.id), Some(2));
        app.handle_key(KeyCode::Char('j'));
        assert_eq!(app.selected_issue().map(|i| i.id), Some(1));
    }

    #[test]
    fn test_lane_for_digit() {
        assert_eq!(lane_for_digit('1'), Some(IssueStatus::ToDo));
        assert_eq!(lane_for_digit('3'), Some(IssueStatus::Done));
        assert_eq!(lane_for_digit('4'), None);
        assert_eq!(lane_for_digit('0'), None);
    }
}
