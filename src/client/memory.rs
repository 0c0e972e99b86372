//! In-memory gateway backing store and board tests.
//!
//! Behaves like the REST API (ids assigned on create, 404 for unknown ids) and
//! adds two test levers: per-operation failure injection, and held responses
//! (status updates, issue lists) that only resolve when the test releases
//! them. Holding lets a test observe the store mid-request and choose the
//! order responses arrive in.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::gateway::{AuthGateway, IssueGateway, ProjectGateway};
use crate::error::{KanbanError, KanbanResult};
use crate::models::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListIssues,
    GetIssue,
    CreateIssue,
    UpdateIssue,
    UpdateIssueStatus,
    DeleteIssue,
    ListProjects,
    GetProject,
    CreateProject,
    UpdateProject,
    DeleteProject,
    Login,
    Signup,
    CurrentUser,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    Network(String),
    Status { status: u16, detail: Option<String> },
}

impl Failure {
    pub fn network() -> Self {
        Failure::Network("connection reset by peer".to_string())
    }

    pub fn detail(status: u16, detail: &str) -> Self {
        Failure::Status {
            status,
            detail: Some(detail.to_string()),
        }
    }

    fn to_error(&self) -> KanbanError {
        match self {
            Failure::Network(msg) => KanbanError::Network(msg.clone()),
            Failure::Status { status: 401, detail } => {
                KanbanError::Unauthorized(detail.clone().unwrap_or_else(|| "unauthorized".to_string()))
            }
            Failure::Status { status, detail } => KanbanError::Api {
                status: *status,
                detail: detail.clone(),
            },
        }
    }
}

/// Releases one held response.
#[derive(Debug)]
pub struct ResponseGate {
    sender: oneshot::Sender<Option<Failure>>,
}

impl ResponseGate {
    pub fn succeed(self) {
        let _ = self.sender.send(None);
    }

    pub fn fail(self, failure: Failure) {
        let _ = self.sender.send(Some(failure));
    }
}

#[derive(Default)]
struct Inner {
    issues: Vec<Issue>,
    projects: Vec<Project>,
    next_issue_id: IssueId,
    next_project_id: ProjectId,
    failures: HashMap<Operation, Failure>,
    held: HashMap<(IssueId, IssueStatus), oneshot::Receiver<Option<Failure>>>,
    held_lists: HashMap<ProjectId, oneshot::Receiver<Option<Failure>>>,
    calls: Vec<Operation>,
    accounts: Vec<(User, String)>,
    session: Option<User>,
}

impl Inner {
    /// Records the call and returns the injected failure for it, if any.
    fn begin(&mut self, op: Operation) -> KanbanResult<()> {
        self.calls.push(op);
        match self.failures.get(&op) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn issue_mut(&mut self, issue_id: IssueId) -> KanbanResult<&mut Issue> {
        self.issues
            .iter_mut()
            .find(|issue| issue.id == issue_id)
            .ok_or_else(|| not_found("Issue"))
    }

    fn project_mut(&mut self, project_id: ProjectId) -> KanbanResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|project| project.id == project_id)
            .ok_or_else(|| not_found("Project"))
    }
}

fn unauthorized(detail: &str) -> KanbanError {
    KanbanError::Unauthorized(detail.to_string())
}

fn not_found(what: &str) -> KanbanError {
    KanbanError::Api {
        status: 404,
        detail: Some(format!("{} not found", what)),
    }
}

#[derive(Default)]
pub struct InMemoryGateway {
    inner: Mutex<Inner>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issues(issues: Vec<Issue>) -> Self {
        let gateway = Self::new();
        {
            let mut inner = gateway.lock();
            inner.next_issue_id = issues.iter().map(|issue| issue.id).max().unwrap_or(0);
            inner.issues = issues;
        }
        gateway
    }

    pub fn add_project(&self, project: Project) {
        let mut inner = self.lock();
        inner.next_project_id = inner.next_project_id.max(project.id);
        inner.projects.push(project);
    }

    pub fn add_account(&self, user: User, password: &str) {
        self.lock().accounts.push((user, password.to_string()));
    }

    /// Forgets the logged-in user, so the next `current_user` call is a 401.
    pub fn expire_session(&self) {
        self.lock().session = None;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes every subsequent call of `op` fail until [`recover`](Self::recover).
    pub fn fail(&self, op: Operation, failure: Failure) {
        self.lock().failures.insert(op, failure);
    }

    pub fn recover(&self, op: Operation) {
        self.lock().failures.remove(&op);
    }

    /// Holds the next status update of `issue_id` to `status` until the
    /// returned gate is released. Dropping the gate fails the update.
    pub fn hold_status_update(&self, issue_id: IssueId, status: IssueStatus) -> ResponseGate {
        let (sender, receiver) = oneshot::channel();
        self.lock().held.insert((issue_id, status), receiver);
        ResponseGate { sender }
    }

    /// Holds the next issue listing of `project_id` until the gate is released.
    pub fn hold_list_issues(&self, project_id: ProjectId) -> ResponseGate {
        let (sender, receiver) = oneshot::channel();
        self.lock().held_lists.insert(project_id, receiver);
        ResponseGate { sender }
    }

    async fn await_release(
        &self,
        held: Option<oneshot::Receiver<Option<Failure>>>,
        op: Operation,
    ) -> KanbanResult<()> {
        let failure = match held {
            Some(receiver) => receiver
                .await
                .unwrap_or_else(|_| Some(Failure::Network("request abandoned".to_string()))),
            None => self.injected_failure(op),
        };

        match failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn injected_failure(&self, op: Operation) -> Option<Failure> {
        self.lock().failures.get(&op).cloned()
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, op: Operation) -> usize {
        self.lock().calls.iter().filter(|call| **call == op).count()
    }

    /// Server-side copy of an issue, for asserting what was persisted.
    pub fn stored_issue(&self, issue_id: IssueId) -> Option<Issue> {
        self.lock().issues.iter().find(|issue| issue.id == issue_id).cloned()
    }
}

#[async_trait]
impl IssueGateway for InMemoryGateway {
    async fn list_issues(&self, project_id: ProjectId) -> KanbanResult<Vec<Issue>> {
        let held = {
            let mut inner = self.lock();
            inner.calls.push(Operation::ListIssues);
            inner.held_lists.remove(&project_id)
        };
        self.await_release(held, Operation::ListIssues).await?;

        Ok(self
            .lock()
            .issues
            .iter()
            .filter(|issue| issue.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn get_issue(&self, issue_id: IssueId) -> KanbanResult<Issue> {
        let mut inner = self.lock();
        inner.begin(Operation::GetIssue)?;
        inner.issue_mut(issue_id).map(|issue| issue.clone())
    }

    async fn create_issue(&self, draft: &IssueDraft) -> KanbanResult<Issue> {
        let mut inner = self.lock();
        inner.begin(Operation::CreateIssue)?;
        inner.next_issue_id += 1;
        let issue = draft.clone().into_issue(inner.next_issue_id);
        inner.issues.push(issue.clone());
        Ok(issue)
    }

    async fn update_issue(&self, issue_id: IssueId, draft: &IssueDraft) -> KanbanResult<Issue> {
        let mut inner = self.lock();
        inner.begin(Operation::UpdateIssue)?;
        let issue = inner.issue_mut(issue_id)?;
        // project ownership is immutable server-side
        let project_id = issue.project_id;
        *issue = draft.clone().into_issue(issue_id);
        issue.project_id = project_id;
        Ok(issue.clone())
    }

    async fn update_issue_status(&self, issue_id: IssueId, status: IssueStatus) -> KanbanResult<()> {
        let held = {
            let mut inner = self.lock();
            inner.calls.push(Operation::UpdateIssueStatus);
            inner.held.remove(&(issue_id, status))
        };

        self.await_release(held, Operation::UpdateIssueStatus).await?;

        self.lock().issue_mut(issue_id)?.status = status;
        Ok(())
    }

    async fn delete_issue(&self, issue_id: IssueId) -> KanbanResult<()> {
        let mut inner = self.lock();
        inner.begin(Operation::DeleteIssue)?;
        let before = inner.issues.len();
        inner.issues.retain(|issue| issue.id != issue_id);
        if inner.issues.len() == before {
            return Err(not_found("Issue"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectGateway for InMemoryGateway {
    async fn list_projects(&self) -> KanbanResult<Vec<Project>> {
        let mut inner = self.lock();
        inner.begin(Operation::ListProjects)?;
        Ok(inner.projects.clone())
    }

    async fn get_project(&self, project_id: ProjectId) -> KanbanResult<Project> {
        let mut inner = self.lock();
        inner.begin(Operation::GetProject)?;
        inner.project_mut(project_id).map(|project| project.clone())
    }

    async fn create_project(&self, draft: &ProjectDraft) -> KanbanResult<Project> {
        let mut inner = self.lock();
        inner.begin(Operation::CreateProject)?;
        inner.next_project_id += 1;
        let project = Project {
            id: inner.next_project_id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            owner_id: 1,
        };
        inner.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(&self, project_id: ProjectId, draft: &ProjectDraft) -> KanbanResult<Project> {
        let mut inner = self.lock();
        inner.begin(Operation::UpdateProject)?;
        let project = inner.project_mut(project_id)?;
        project.name = draft.name.clone();
        project.description = draft.description.clone();
        Ok(project.clone())
    }

    async fn delete_project(&self, project_id: ProjectId) -> KanbanResult<()> {
        let mut inner = self.lock();
        inner.begin(Operation::DeleteProject)?;
        inner.project_mut(project_id)?;
        inner.projects.retain(|project| project.id != project_id);
        inner.issues.retain(|issue| issue.project_id != project_id);
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for InMemoryGateway {
    async fn login(&self, data: &LoginData) -> KanbanResult<AuthResponse> {
        let mut inner = self.lock();
        inner.begin(Operation::Login)?;
        let user = inner
            .accounts
            .iter()
            .find(|(user, password)| user.email == data.email && *password == data.password)
            .map(|(user, _)| user.clone())
            .ok_or_else(|| unauthorized("Invalid credentials"))?;
        inner.session = Some(user.clone());
        Ok(AuthResponse {
            access_token: format!("token-{}", user.id),
            token_type: "bearer".to_string(),
            user,
        })
    }

    async fn signup(&self, data: &SignupData) -> KanbanResult<AuthResponse> {
        let mut inner = self.lock();
        inner.begin(Operation::Signup)?;
        if inner.accounts.iter().any(|(user, _)| user.email == data.email) {
            return Err(KanbanError::Api {
                status: 400,
                detail: Some("Email already registered".to_string()),
            });
        }
        let user = User {
            id: inner.accounts.len() as u64 + 1,
            username: data.username.clone(),
            email: data.email.clone(),
        };
        inner.accounts.push((user.clone(), data.password.clone()));
        inner.session = Some(user.clone());
        Ok(AuthResponse {
            access_token: format!("token-{}", user.id),
            token_type: "bearer".to_string(),
            user,
        })
    }

    async fn current_user(&self) -> KanbanResult<User> {
        let mut inner = self.lock();
        inner.begin(Operation::CurrentUser)?;
        inner.session.clone().ok_or_else(|| unauthorized("Invalid token"))
    }
}
